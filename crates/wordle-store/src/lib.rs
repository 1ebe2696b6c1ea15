//! # wordle-store
//!
//! Persistent player state for the word game.
//!
//! This crate provides:
//! - Ranked player directory (best average solve times)
//! - Time-attack leaderboard
//! - Resumable session slots with caller-driven eviction
//! - XOR obfuscation and the flat record format used on disk
//! - Word catalog and guess feedback used by front ends

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod guess;
pub mod storage;
pub mod store;

pub use catalog::{Category, WordCatalog, WordPick};
pub use codec::XorCodec;
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use guess::{LetterStatus, evaluate_guess, is_solved, letter_summary};
pub use storage::{
    LeaderboardStore, PlayerRecord, PlayerStore, RankedDirectory, SaveOutcome, ScoreLeaderboard,
    SessionCategory, SessionRecord, SessionState, SessionStore, SessionTable, SlotSelector,
    TimedScoreRecord, validate_field, validate_username,
};
pub use store::{GameStore, NameCheck};
