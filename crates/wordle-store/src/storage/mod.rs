//! Persistent player state.
//!
//! Three collections, each stored as one obfuscated text file:
//!
//! - **Ranked players**: win statistics ordered by average solve time (top 20)
//! - **Timed scores**: time-attack results ordered by score, then round length (top 20)
//! - **Sessions**: up to five paused games, keyed by username
//!
//! Loading never fails on bad content: a missing file is an empty
//! collection and a malformed record is skipped. Writes report errors to the
//! caller.

mod file;
mod format;
mod leaderboard;
mod players;
mod sessions;

pub use format::{
    RESERVED_CHARS, decode_player, decode_players, decode_session, decode_sessions,
    decode_timed_scores, encode_player, encode_players, encode_session, encode_sessions,
    encode_timed_scores, validate_field, validate_username,
};
pub use leaderboard::*;
pub use players::*;
pub use sessions::*;
