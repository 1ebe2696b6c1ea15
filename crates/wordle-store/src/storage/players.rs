//! Ranked player directory: per-player win statistics ordered by average
//! solve time, capped at the best [`MAX_RANKED_PLAYERS`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::XorCodec;
use crate::config::limits::MAX_RANKED_PLAYERS;
use crate::error::{Error, Result};

use super::file::{read_text, read_text_or_empty, write_text};
use super::format::{decode_players, encode_players, validate_field, validate_username};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub games: u32,
    /// Cumulative seconds across all wins
    pub total_time: f64,
    /// `total_time / games`, recomputed on every win
    pub avg_time: f64,
    pub last_word: String,
    pub last_guesses: Vec<String>,
}

impl PlayerRecord {
    pub fn first_win(name: &str, elapsed: f64, word: &str, guesses: &[String]) -> Self {
        Self {
            name: name.to_string(),
            games: 1,
            total_time: elapsed,
            avg_time: elapsed,
            last_word: word.to_string(),
            last_guesses: guesses.to_vec(),
        }
    }

    /// Accumulate one more win on top of this record.
    pub fn with_win(&self, elapsed: f64, word: &str, guesses: &[String]) -> Self {
        let total_time = self.total_time + elapsed;
        let games = self.games + 1;
        Self {
            name: self.name.clone(),
            games,
            total_time,
            avg_time: total_time / games as f64,
            last_word: word.to_string(),
            last_guesses: guesses.to_vec(),
        }
    }
}

/// Sorted by `avg_time` ascending. Equal times keep arrival order.
#[derive(Debug, Clone, Default)]
pub struct RankedDirectory {
    records: Vec<PlayerRecord>,
}

impl RankedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory by inserting each record in turn. A later record
    /// with an already-seen name replaces the earlier one.
    pub fn from_records<I: IntoIterator<Item = PlayerRecord>>(records: I) -> Self {
        let mut directory = Self::new();
        for record in records {
            directory.insert_or_replace(record);
        }
        directory
    }

    /// Insert `record`, dropping any existing entry with the same name first.
    ///
    /// Returns the zero-based rank the record landed on, or `None` if it fell
    /// off the end of the directory.
    pub fn insert_or_replace(&mut self, record: PlayerRecord) -> Option<usize> {
        self.remove(&record.name);

        // After every entry whose time is <= the new one
        let position = self
            .records
            .partition_point(|r| r.avg_time <= record.avg_time);
        self.records.insert(position, record);

        if self.records.len() > MAX_RANKED_PLAYERS {
            for dropped in self.records.drain(MAX_RANKED_PLAYERS..) {
                debug!("Dropping {} from ranked directory", dropped.name);
            }
        }

        (position < MAX_RANKED_PLAYERS).then_some(position)
    }

    pub fn find(&self, name: &str) -> Option<&PlayerRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Remove every entry named `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.name != name);
        self.records.len() != before
    }

    pub fn snapshot(&self) -> Vec<PlayerRecord> {
        self.records.clone()
    }

    /// Fold a win into the player's statistics and re-rank them.
    pub fn apply_win(
        &mut self,
        name: &str,
        elapsed: f64,
        word: &str,
        guesses: &[String],
    ) -> PlayerRecord {
        let updated = match self.find(name) {
            Some(existing) => existing.with_win(elapsed, word, guesses),
            None => PlayerRecord::first_win(name, elapsed, word, guesses),
        };
        self.insert_or_replace(updated.clone());
        updated
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// File-backed [`RankedDirectory`].
///
/// The directory is held in memory for the lifetime of the store. A win is
/// applied to a fresh read of the file and written straight back. Wins that
/// could not be written stay in memory and are carried over every later
/// reload until a write succeeds.
pub struct PlayerStore {
    path: PathBuf,
    codec: XorCodec,
    directory: RankedDirectory,
    unsaved: BTreeSet<String>,
}

impl PlayerStore {
    pub fn open<P: AsRef<Path>>(path: P, codec: XorCodec) -> Self {
        let path = path.as_ref().to_path_buf();
        let directory = Self::load_from(&path, &codec);
        Self {
            path,
            codec,
            directory,
            unsaved: BTreeSet::new(),
        }
    }

    fn load_from(path: &Path, codec: &XorCodec) -> RankedDirectory {
        let directory = RankedDirectory::from_records(decode_players(&read_text_or_empty(
            path, codec,
        )));
        debug!(
            "Loaded {} ranked players from {}",
            directory.len(),
            path.display()
        );
        directory
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn directory(&self) -> &RankedDirectory {
        &self.directory
    }

    pub fn find(&self, name: &str) -> Option<&PlayerRecord> {
        self.directory.find(name)
    }

    pub fn snapshot(&self) -> Vec<PlayerRecord> {
        self.directory.snapshot()
    }

    pub fn record_win(
        &mut self,
        name: &str,
        elapsed: f64,
        word: &str,
        guesses: &[String],
    ) -> Result<PlayerRecord> {
        validate_username(name)?;
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(Error::InvalidElapsed(elapsed));
        }
        validate_field("word", word)?;
        for guess in guesses {
            validate_field("guess", guess)?;
        }

        // Pick up whatever is on disk now; if it can't be read, the win still
        // lands in memory but the file is left alone.
        let unreadable = match read_text(&self.path, &self.codec) {
            Ok(current) => {
                self.merge_from_disk(&current);
                None
            }
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                Some(e)
            }
        };

        let updated = self.directory.apply_win(name, elapsed, word, guesses);
        self.unsaved.insert(updated.name.clone());
        if let Some(e) = unreadable {
            return Err(e);
        }
        self.persist()?;
        self.unsaved.clear();
        info!(
            "Recorded win for {} ({} games, avg {:.2}s)",
            updated.name, updated.games, updated.avg_time
        );
        Ok(updated)
    }

    /// Replace the directory with the file's contents, keeping the in-memory
    /// records of players whose wins have not reached the file yet.
    fn merge_from_disk(&mut self, text: &str) {
        let pending: Vec<PlayerRecord> = self
            .unsaved
            .iter()
            .filter_map(|name| self.directory.find(name).cloned())
            .collect();

        self.directory = RankedDirectory::from_records(decode_players(text));
        for record in pending {
            debug!("Carrying unsaved win for {} over reload", record.name);
            self.directory.insert_or_replace(record);
        }
    }

    fn persist(&self) -> Result<()> {
        write_text(
            &self.path,
            &self.codec,
            &encode_players(&self.directory.records),
        )
    }
}
