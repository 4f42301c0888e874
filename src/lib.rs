//! Flipbook composites layered character face sprites and plays their expressions.
//!
//! - Resolve a character and expression through a [`FaceRepository`]
//! - Bind the [`ResolvedFace`] to a [`Surface`] as an [`Individual`]
//! - [`Individual::render`], then drive animations with [`Individual::advance`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod animation;
pub mod assets;
pub mod compose;
pub mod config;
pub mod face;
pub mod foundation;
pub mod individual;
pub mod render;

#[cfg(test)]
#[path = "../tests/unit/fixtures.rs"]
pub(crate) mod fixtures;

pub use crate::animation::clock::{Animator, PlaybackState};
pub use crate::animation::timer::{IntervalTimer, TimerBook};
pub use crate::assets::loader::{AssetLoader, FsLoader, MemoryLoader, ResourcePaths};
pub use crate::assets::store::{FaceRepository, ImageSet, PreparedImage, ResolvedFace};
pub use crate::compose::geometry::{ResolvedFrame, ResolvedPart, resolve_frame};
pub use crate::config::{FrameConfig, FrameType, ViewerConfig};
pub use crate::face::id::CharacterId;
pub use crate::face::listing::{
    DEFAULT_EXPRESSION, ExpressionListing, PREFERRED_EXPRESSION, default_expression,
};
pub use crate::face::model::{AnimatedExpression, Expression, Face, FaceSource, Part};
pub use crate::foundation::core::{Millis, Point, Rect, Rgba8Premul, Size, Span, Vec2};
pub use crate::foundation::error::{FlipbookError, FlipbookResult};
pub use crate::individual::Individual;
pub use crate::render::compositor::Compositor;
pub use crate::render::pixmap::PixmapSurface;
pub use crate::render::surface::{RecordingSurface, Surface, SurfaceOp};
