use std::collections::BTreeMap;

use tracing::debug;

use crate::codec::XorCodec;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::storage::{
    LeaderboardStore, PlayerRecord, PlayerStore, SaveOutcome, SessionRecord, SessionState,
    SessionStore, SlotSelector, TimedScoreRecord,
};

/// Where a prospective new player name is already in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheck {
    Available,
    /// Already on the ranked directory
    Ranked,
    /// Has a paused game waiting
    InSession,
}

/// All persisted player state under one data directory.
pub struct GameStore {
    config: StoreConfig,
    players: PlayerStore,
    timed: LeaderboardStore,
    sessions: SessionStore,
}

impl GameStore {
    pub fn open(config: StoreConfig) -> Self {
        let codec = XorCodec::new(config.key);
        debug!("Opening game store in {}", config.data_dir.display());
        Self {
            players: PlayerStore::open(config.players_path(), codec),
            timed: LeaderboardStore::new(config.timed_scores_path(), codec),
            sessions: SessionStore::new(config.sessions_path(), codec),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // Ranked players

    pub fn record_win(
        &mut self,
        name: &str,
        elapsed_secs: f64,
        word: &str,
        guesses: &[String],
    ) -> Result<PlayerRecord> {
        self.players.record_win(name, elapsed_secs, word, guesses)
    }

    pub fn find_player(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.find(name)
    }

    pub fn ranked_players(&self) -> Vec<PlayerRecord> {
        self.players.snapshot()
    }

    // Timed scores

    pub fn record_timed(&self, duration: u32, score: u32, name: &str) -> Result<Option<usize>> {
        self.timed.record(duration, score, name)
    }

    pub fn timed_scores(&self) -> Vec<TimedScoreRecord> {
        self.timed.snapshot()
    }

    pub fn best_timed_by_duration(&self) -> BTreeMap<u32, TimedScoreRecord> {
        self.timed.best_by_duration()
    }

    // Sessions

    pub fn active_sessions(&self) -> Vec<String> {
        self.sessions.list_active()
    }

    pub fn load_session(&self, username: &str) -> Option<SessionRecord> {
        self.sessions.load(username)
    }

    pub fn try_save_session(&self, username: &str, state: &SessionState) -> Result<SaveOutcome> {
        self.sessions.try_save(username, state)
    }

    pub fn save_session_with_eviction(
        &self,
        username: &str,
        state: &SessionState,
        victim: &str,
    ) -> Result<()> {
        self.sessions.save_with_eviction(username, state, victim)
    }

    pub fn save_session(
        &self,
        username: &str,
        state: &SessionState,
        overwrite_target: Option<&str>,
    ) -> Result<bool> {
        self.sessions.save(username, state, overwrite_target)
    }

    pub fn save_session_negotiated(
        &self,
        username: &str,
        state: &SessionState,
        selector: &dyn SlotSelector,
    ) -> Result<bool> {
        self.sessions.save_negotiated(username, state, selector)
    }

    pub fn delete_session(&self, username: &str) -> Result<bool> {
        self.sessions.delete(username)
    }

    /// Whether `name` can be taken by a new player.
    pub fn check_new_name(&self, name: &str) -> NameCheck {
        if self.players.find(name).is_some() {
            NameCheck::Ranked
        } else if self.sessions.list_active().iter().any(|n| n == name) {
            NameCheck::InSession
        } else {
            NameCheck::Available
        }
    }
}
