//! Turning part name lists into absolute, drawable geometry.

pub mod geometry;
