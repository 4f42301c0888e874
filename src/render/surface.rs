use crate::{
    assets::store::PreparedImage,
    foundation::core::{Point, Rect, Rgba8Premul, Vec2},
};

/// 2D drawing target owned by exactly one compositor at a time.
///
/// Coordinates passed to drawing calls are in user space: the current translation is added
/// before they reach device pixels. Resizing drops all content and resets the translation, the
/// same way assigning a canvas' width or height does.
pub trait Surface {
    /// Device size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize, clearing content and resetting the translation to zero.
    fn resize(&mut self, width: u32, height: u32);

    /// Current user-to-device translation.
    fn translation(&self) -> Vec2;

    /// Add `by` to the current translation.
    fn translate(&mut self, by: Vec2);

    /// Clear `rect` (user space) to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Copy `src` (image space) 1:1 into `dest` (user space), scaled by `opacity`.
    fn draw_image(&mut self, image: &PreparedImage, src: Rect, dest: Rect, opacity: f32);

    /// Outline `rect` (user space) with a one pixel line.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba8Premul);

    /// Place `text` centered on `at` (user space).
    fn fill_text(&mut self, text: &str, at: Point, color: Rgba8Premul);

    /// Clear the whole visible area, whatever the translation.
    fn clear_visible(&mut self) {
        let (w, h) = self.size();
        let t = self.translation();
        self.clear_rect(Rect::new(
            -t.x,
            -t.y,
            -t.x + f64::from(w),
            -t.y + f64::from(h),
        ));
    }
}

/// Operation captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// [`Surface::resize`].
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// [`Surface::translate`].
    Translate(Vec2),
    /// [`Surface::clear_rect`].
    Clear(Rect),
    /// [`Surface::draw_image`].
    DrawImage {
        /// Source image size, to tell images apart in assertions.
        image_size: (u32, u32),
        /// Source rectangle.
        src: Rect,
        /// Destination rectangle.
        dest: Rect,
        /// Opacity.
        opacity: f32,
    },
    /// [`Surface::stroke_rect`].
    StrokeRect(Rect),
    /// [`Surface::fill_text`].
    FillText {
        /// Label text.
        text: String,
        /// Anchor point.
        at: Point,
    },
}

/// Surface that records operations instead of rasterizing them. For tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    translation: Vec2,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Create an empty recorder with the given device size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            translation: Vec2::ZERO,
            ops: Vec::new(),
        }
    }

    /// Operations recorded so far, in call order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drain recorded operations.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Destination rectangles of recorded image draws.
    pub fn drawn_rects(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::DrawImage { dest, .. } => Some(*dest),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.translation = Vec2::ZERO;
        self.ops.push(SurfaceOp::Resize { width, height });
    }

    fn translation(&self) -> Vec2 {
        self.translation
    }

    fn translate(&mut self, by: Vec2) {
        self.translation += by;
        self.ops.push(SurfaceOp::Translate(by));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(SurfaceOp::Clear(rect));
    }

    fn draw_image(&mut self, image: &PreparedImage, src: Rect, dest: Rect, opacity: f32) {
        self.ops.push(SurfaceOp::DrawImage {
            image_size: (image.width, image.height),
            src,
            dest,
            opacity,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Rgba8Premul) {
        self.ops.push(SurfaceOp::StrokeRect(rect));
    }

    fn fill_text(&mut self, text: &str, at: Point, _color: Rgba8Premul) {
        self.ops.push(SurfaceOp::FillText {
            text: text.to_owned(),
            at,
        });
    }
}
