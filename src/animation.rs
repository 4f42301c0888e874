//! Virtual-time playback of animated expressions.

pub mod clock;
pub mod sequence;
pub mod timer;
