//! Resumable game sessions.
//!
//! At most [`MAX_SESSIONS`] players can have a paused game at once. When the
//! table is full the store does not pick a slot to free up; it reports
//! [`SaveOutcome::SlotsFull`] and the caller decides, usually by asking the
//! player through a [`SlotSelector`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::XorCodec;
use crate::config::limits::MAX_SESSIONS;
use crate::error::Result;

use super::file::{read_text, read_text_or_empty, write_text};
use super::format::{decode_sessions, encode_sessions, validate_field, validate_username};

/// Which word source a paused game came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum SessionCategory {
    /// The word of the day
    Daily,
    Infinite,
    /// A named catalog category
    Named(String),
}

impl SessionCategory {
    pub const DAILY_TAG: &'static str = "WORDLE";
    pub const INFINITE_TAG: &'static str = "INFINITE";
}

impl fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str(Self::DAILY_TAG),
            Self::Infinite => f.write_str(Self::INFINITE_TAG),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for SessionCategory {
    fn from(value: &str) -> Self {
        match value {
            Self::DAILY_TAG => Self::Daily,
            Self::INFINITE_TAG => Self::Infinite,
            other => Self::Named(other.to_string()),
        }
    }
}

impl From<SessionCategory> for String {
    fn from(category: SessionCategory) -> Self {
        category.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub target: String,
    pub guesses: Vec<String>,
    pub category: SessionCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub username: String,
    #[serde(flatten)]
    pub state: SessionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Table is full and no slot was named for eviction
    SlotsFull { occupied: Vec<String> },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Picks which occupied slot to give up when the table is full.
///
/// Returning `None` abandons the save.
pub trait SlotSelector {
    fn select_victim(&self, occupied: &[String]) -> Option<String>;
}

impl<F> SlotSelector for F
where
    F: Fn(&[String]) -> Option<String>,
{
    fn select_victim(&self, occupied: &[String]) -> Option<String> {
        self(occupied)
    }
}

/// In-memory session slots in storage order.
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    records: Vec<SessionRecord>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated username replaces the earlier record but keeps its slot.
    pub fn from_records<I: IntoIterator<Item = SessionRecord>>(records: I) -> Self {
        let mut table = Self::new();
        for record in records {
            match table.position(&record.username) {
                Some(index) => table.records[index] = record,
                None => table.records.push(record),
            }
        }
        table
    }

    fn position(&self, username: &str) -> Option<usize> {
        self.records.iter().position(|r| r.username == username)
    }

    pub fn usernames(&self) -> Vec<String> {
        self.records.iter().map(|r| r.username.clone()).collect()
    }

    pub fn get(&self, username: &str) -> Option<&SessionRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    /// Place `record` in the table.
    ///
    /// An existing slot for the same user is overwritten in place. Otherwise a
    /// free slot is used; `overwrite_target` is only consulted once the table
    /// is full.
    pub fn admit(&mut self, record: SessionRecord, overwrite_target: Option<&str>) -> SaveOutcome {
        if let Some(index) = self.position(&record.username) {
            self.records[index] = record;
            return SaveOutcome::Saved;
        }

        if self.records.len() < MAX_SESSIONS {
            self.records.push(record);
            return SaveOutcome::Saved;
        }

        let Some(victim) = overwrite_target else {
            return SaveOutcome::SlotsFull {
                occupied: self.usernames(),
            };
        };

        if !self.remove(victim) {
            warn!(
                "Eviction target {} has no slot, session table grows past {}",
                victim, MAX_SESSIONS
            );
        }
        self.records.push(record);
        SaveOutcome::Saved
    }

    pub fn remove(&mut self, username: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.username != username);
        self.records.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= MAX_SESSIONS
    }
}

/// File-backed [`SessionTable`]. Every call reads the whole file and, when it
/// changes anything, writes the whole file back.
pub struct SessionStore {
    path: PathBuf,
    codec: XorCodec,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P, codec: XorCodec) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_table(&self) -> SessionTable {
        let text = read_text_or_empty(&self.path, &self.codec);
        let table = SessionTable::from_records(decode_sessions(&text));
        debug!("Loaded {} sessions from {}", table.len(), self.path.display());
        table
    }

    pub fn list_active(&self) -> Vec<String> {
        self.load_table().usernames()
    }

    pub fn load(&self, username: &str) -> Option<SessionRecord> {
        self.load_table().get(username).cloned()
    }

    /// Save without evicting anyone. A full table yields
    /// [`SaveOutcome::SlotsFull`] and leaves the file untouched.
    pub fn try_save(&self, username: &str, state: &SessionState) -> Result<SaveOutcome> {
        self.save_inner(username, state, None)
    }

    /// Save, giving up `victim`'s slot if the table is full.
    pub fn save_with_eviction(
        &self,
        username: &str,
        state: &SessionState,
        victim: &str,
    ) -> Result<()> {
        self.save_inner(username, state, Some(victim)).map(|_| ())
    }

    /// Single-call form: `Ok(false)` means the table is full and no
    /// `overwrite_target` was given.
    pub fn save(
        &self,
        username: &str,
        state: &SessionState,
        overwrite_target: Option<&str>,
    ) -> Result<bool> {
        Ok(self
            .save_inner(username, state, overwrite_target)?
            .is_saved())
    }

    /// Try to save; if the table is full, ask `selector` which slot to free
    /// and retry with that one. `Ok(false)` if the selector declined.
    pub fn save_negotiated(
        &self,
        username: &str,
        state: &SessionState,
        selector: &dyn SlotSelector,
    ) -> Result<bool> {
        let occupied = match self.try_save(username, state)? {
            SaveOutcome::Saved => return Ok(true),
            SaveOutcome::SlotsFull { occupied } => occupied,
        };

        match selector.select_victim(&occupied) {
            Some(victim) => {
                self.save_with_eviction(username, state, &victim)?;
                Ok(true)
            }
            None => {
                info!("Session for {} not saved, no slot chosen", username);
                Ok(false)
            }
        }
    }

    /// Remove `username`'s slot. Returns whether one existed.
    pub fn delete(&self, username: &str) -> Result<bool> {
        let mut table = SessionTable::from_records(decode_sessions(&read_text(
            &self.path,
            &self.codec,
        )?));
        if !table.remove(username) {
            return Ok(false);
        }

        self.write_table(&table)?;
        info!("Deleted session for {}", username);
        Ok(true)
    }

    fn save_inner(
        &self,
        username: &str,
        state: &SessionState,
        overwrite_target: Option<&str>,
    ) -> Result<SaveOutcome> {
        validate_username(username)?;
        validate_field("target", &state.target)?;
        for guess in &state.guesses {
            validate_field("guess", guess)?;
        }
        validate_field("category", &state.category.to_string())?;

        let mut table = SessionTable::from_records(decode_sessions(&read_text(
            &self.path,
            &self.codec,
        )?));
        let record = SessionRecord {
            username: username.to_string(),
            state: state.clone(),
        };

        let outcome = table.admit(record, overwrite_target);
        if outcome.is_saved() {
            self.write_table(&table)?;
            info!("Saved session for {}", username);
        } else {
            debug!("Session table full, {} needs a slot", username);
        }
        Ok(outcome)
    }

    fn write_table(&self, table: &SessionTable) -> Result<()> {
        write_text(&self.path, &self.codec, &encode_sessions(&table.records))
    }
}
