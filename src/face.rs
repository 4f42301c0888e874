//! Character face data: parts, expressions and the `face` field variants.

pub mod id;
pub mod listing;
pub mod model;
