//! Shared vocabulary: geometry, time, colors and the error type.

pub mod core;
pub mod error;
