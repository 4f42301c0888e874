//! Drawing surfaces and the frame compositor.

pub mod compositor;
pub mod pixmap;
pub mod surface;
