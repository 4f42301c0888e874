//! Fetching, decoding and caching character documents and sprite sheets.

pub mod decode;
pub mod loader;
pub mod store;
