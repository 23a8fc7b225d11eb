//! Request handlers for the song catalog.

mod songs;

pub use songs::*;
