pub use kurbo::{Point, Rect, Size, Vec2};

/// Point on the playback timeline, in whole milliseconds since the viewer started.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Timeline origin.
    pub const ZERO: Self = Self(0);

    /// Add `delta` milliseconds using saturating arithmetic.
    pub fn after(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Add `delta` milliseconds, `None` past the end of the timeline.
    pub fn checked_after(self, delta: u64) -> Option<Self> {
        self.0.checked_add(delta).map(Self)
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is later.
    pub fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Accumulated bounding box of resolved part rectangles.
///
/// A fresh span is the sentinel `{+inf, -inf, +inf, -inf}`. It only becomes usable once at least
/// one rectangle has been folded in, so sizing code must check [`Span::is_empty`] first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    /// Smallest x of any folded rectangle.
    pub min_x: f64,
    /// Largest x of any folded rectangle.
    pub max_x: f64,
    /// Smallest y of any folded rectangle.
    pub min_y: f64,
    /// Largest y of any folded rectangle.
    pub max_y: f64,
}

impl Default for Span {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Span {
    /// The empty sentinel.
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// Return `true` while no rectangle has been folded in.
    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    /// Return the span widened to also cover `rect`.
    pub fn widen(self, rect: Rect) -> Self {
        Self {
            min_x: self.min_x.min(rect.x0),
            max_x: self.max_x.max(rect.x1),
            min_y: self.min_y.min(rect.y0),
            max_y: self.max_y.max(rect.y1),
        }
    }

    /// Horizontal extent; meaningless for the empty sentinel.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent; meaningless for the empty sentinel.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Convert to a rectangle, `None` for the empty sentinel.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        Some(Rect::new(self.min_x, self.min_y, self.max_x, self.max_y))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
    /// Opaque black, used for debug labels.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque grey, used for debug outlines.
    pub const GREY: Self = Self::opaque(128, 128, 128);

    /// Opaque color from straight channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as an array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
