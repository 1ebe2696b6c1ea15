//! Process-wide constants and the store configuration.

use std::path::{Path, PathBuf};

/// Default location of all persisted files
pub const DEFAULT_DATA_DIR: &str = "assets/data";

/// Single-byte key used by [`XorCodec`](crate::codec::XorCodec)
pub const DEFAULT_KEY: u8 = 157;

pub mod files {
    pub const PLAYERS: &str = "users.bin";
    pub const SESSIONS: &str = "sessions.bin";
    pub const TIMED_SCORES: &str = "time_stats.bin";
    /// Plain-text word catalog (not obfuscated)
    pub const WORDS: &str = "words.txt";
}

pub mod limits {
    pub const MAX_RANKED_PLAYERS: usize = 20;
    pub const MAX_TIMED_SCORES: usize = 20;
    pub const MAX_SESSIONS: usize = 5;
    pub const MAX_USERNAME_LEN: usize = 12;
}

pub mod game {
    /// Round lengths offered in time-attack mode (seconds)
    pub const TIMED_DURATIONS: [u32; 3] = [30, 60, 90];
    /// Guess allowance for the daily and infinite modes
    pub const STANDARD_GUESSES: u32 = 6;
    pub const WORD_LEN: usize = 5;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub key: u8,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            key: DEFAULT_KEY,
        }
    }
}

impl StoreConfig {
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(files::PLAYERS)
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.data_dir.join(files::SESSIONS)
    }

    pub fn timed_scores_path(&self) -> PathBuf {
        self.data_dir.join(files::TIMED_SCORES)
    }

    pub fn words_path(&self) -> PathBuf {
        self.data_dir.join(files::WORDS)
    }
}
