//! CLI command implementations.

pub mod play;
pub mod players;
pub mod sessions;
pub mod timed;
