//! Database module for SQLite persistence.

mod pool;
mod stats;
mod tracks;

pub use pool::*;
pub use stats::*;
pub use tracks::*;
