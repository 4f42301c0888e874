use std::sync::Arc;

use crate::{
    assets::store::ImageSet,
    compose::geometry::{ResolvedFrame, ResolvedPart, resolve_frame},
    config::{FrameConfig, FrameType},
    face::model::Face,
    foundation::core::{Point, Rgba8Premul, Span, Vec2},
    foundation::error::FlipbookResult,
    render::surface::Surface,
};

/// Horizontal inset keeping debug labels off the left and right part edges.
pub const LABEL_INSET_X: f64 = 40.0;
/// Vertical inset keeping debug labels off the top and bottom part edges.
pub const LABEL_INSET_Y: f64 = 5.0;
/// Opacity of parts drawn in debug mode.
pub const DEBUG_OPACITY: f32 = 0.2;

/// Paints resolved frames of one face onto a surface it exclusively owns.
pub struct Compositor<S> {
    surface: S,
    face: Arc<Face>,
    images: ImageSet,
}

impl<S: Surface> Compositor<S> {
    /// Take ownership of `surface` and size it to the face's reference size.
    pub fn new(mut surface: S, face: Arc<Face>, images: ImageSet) -> Self {
        surface.resize(face.width, face.height);
        Self {
            surface,
            face,
            images,
        }
    }

    /// Face being drawn.
    pub fn face(&self) -> &Face {
        &self.face
    }

    /// Owned surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Owned surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Clear, resolve and paint one frame; returns the frame's span.
    ///
    /// `calibrate` is set for the first frame under a new config only: it sizes and translates
    /// the surface for the framing mode. Later frames reuse that size and transform.
    #[tracing::instrument(level = "trace", skip(self, names))]
    pub fn draw_frame(
        &mut self,
        names: &[String],
        config: &FrameConfig,
        calibrate: bool,
    ) -> FlipbookResult<Span> {
        self.surface.clear_visible();

        let frame = resolve_frame(names, &self.face, config.frame_type == FrameType::FaceOnly)?;
        if calibrate {
            self.calibrate(config.frame_type, frame.span);
        }
        self.paint(&frame, config.debug)?;
        Ok(frame.span)
    }

    /// Span of a frame with every slot included, whatever the framing mode.
    pub fn expanded_span(&self, names: &[String]) -> FlipbookResult<Span> {
        Ok(resolve_frame(names, &self.face, false)?.span)
    }

    fn calibrate(&mut self, frame_type: FrameType, span: Span) {
        match frame_type {
            FrameType::Default => {
                self.surface.resize(self.face.width, self.face.height);
            }
            FrameType::FaceOnly | FrameType::Expand => {
                if span.is_empty() {
                    tracing::warn!(?frame_type, "empty frame, keeping surface size");
                    return;
                }
                self.surface
                    .resize(span.width().max(0.0) as u32, span.height().max(0.0) as u32);
                self.surface.translate(Vec2::new(-span.min_x, -span.min_y));
            }
        }
    }

    fn paint(&mut self, frame: &ResolvedFrame, debug: bool) -> FlipbookResult<()> {
        let opacity = if debug { DEBUG_OPACITY } else { 1.0 };
        for part in &frame.parts {
            let image = self.images.get(&part.image)?;
            self.surface.draw_image(image, part.source_rect(), part.dest_rect(), opacity);
            if debug {
                self.surface.stroke_rect(part.dest_rect(), Rgba8Premul::GREY);
                self.surface.fill_text(&part.label(), label_anchor(part), Rgba8Premul::BLACK);
            }
        }
        Ok(())
    }
}

/// Where a part's debug label goes: its center, pushed inward from the edges.
pub fn label_anchor(part: &ResolvedPart) -> Point {
    let r = part.dest_rect();
    let c = r.center();
    Point::new(
        clamp_inward(c.x, r.x0 + LABEL_INSET_X, r.x1 - LABEL_INSET_X),
        clamp_inward(c.y, r.y0 + LABEL_INSET_Y, r.y1 - LABEL_INSET_Y),
    )
}

/// Clamp `v` into `[lo, hi]`; inverted bounds give their midpoint.
pub fn clamp_inward(v: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        return (lo + hi) / 2.0;
    }
    v.clamp(lo, hi)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
