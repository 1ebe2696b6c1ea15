//! Time-attack leaderboard.
//!
//! Entries are ranked by score (highest first), then by round length
//! (longest first). Entries with an equal score and duration keep the order
//! they were recorded in, so an older result stays ahead of a newer tie.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::codec::XorCodec;
use crate::config::limits::MAX_TIMED_SCORES;
use crate::error::Result;

use super::file::{read_text, read_text_or_empty, write_text};
use super::format::{decode_timed_scores, encode_timed_scores, validate_username};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedScoreRecord {
    /// Round length in seconds
    pub duration: u32,
    /// Words solved before the clock ran out
    pub score: u32,
    pub name: String,
}

fn rank_order(a: &TimedScoreRecord, b: &TimedScoreRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.duration.cmp(&a.duration))
}

#[derive(Debug, Clone, Default)]
pub struct ScoreLeaderboard {
    entries: Vec<TimedScoreRecord>,
}

impl ScoreLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I: IntoIterator<Item = TimedScoreRecord>>(records: I) -> Self {
        let mut entries: Vec<_> = records.into_iter().collect();
        entries.sort_by(rank_order);
        entries.truncate(MAX_TIMED_SCORES);
        Self { entries }
    }

    /// Append a result and re-rank. Returns the zero-based rank of the new
    /// entry, or `None` if it did not make the cut.
    pub fn push(&mut self, record: TimedScoreRecord) -> Option<usize> {
        // Stable sort keeps the new entry behind any equal older one, so its
        // rank is the number of entries that sort at or before it.
        let rank = self
            .entries
            .iter()
            .filter(|e| rank_order(e, &record) != Ordering::Greater)
            .count();

        self.entries.push(record);
        self.entries.sort_by(rank_order);
        self.entries.truncate(MAX_TIMED_SCORES);

        (rank < MAX_TIMED_SCORES).then_some(rank)
    }

    pub fn snapshot(&self) -> Vec<TimedScoreRecord> {
        self.entries.clone()
    }

    /// Highest-ranked entry for each round length.
    pub fn best_by_duration(&self) -> BTreeMap<u32, TimedScoreRecord> {
        let mut best = BTreeMap::new();
        for entry in &self.entries {
            best.entry(entry.duration).or_insert_with(|| entry.clone());
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedScoreRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File-backed [`ScoreLeaderboard`]. Every call reads the whole file.
pub struct LeaderboardStore {
    path: PathBuf,
    codec: XorCodec,
}

impl LeaderboardStore {
    pub fn new<P: AsRef<Path>>(path: P, codec: XorCodec) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ScoreLeaderboard {
        let leaderboard = ScoreLeaderboard::from_records(decode_timed_scores(
            &read_text_or_empty(&self.path, &self.codec),
        ));
        debug!(
            "Loaded {} timed scores from {}",
            leaderboard.len(),
            self.path.display()
        );
        leaderboard
    }

    pub fn snapshot(&self) -> Vec<TimedScoreRecord> {
        self.load().snapshot()
    }

    pub fn best_by_duration(&self) -> BTreeMap<u32, TimedScoreRecord> {
        self.load().best_by_duration()
    }

    /// Record a completed round and persist the re-ranked leaderboard.
    pub fn record(&self, duration: u32, score: u32, name: &str) -> Result<Option<usize>> {
        validate_username(name)?;

        let text = read_text(&self.path, &self.codec)?;
        let mut leaderboard = ScoreLeaderboard::from_records(decode_timed_scores(&text));
        let rank = leaderboard.push(TimedScoreRecord {
            duration,
            score,
            name: name.to_string(),
        });

        write_text(
            &self.path,
            &self.codec,
            &encode_timed_scores(&leaderboard.entries),
        )?;
        info!(
            "Recorded timed score {} over {}s for {} (rank {:?})",
            score, duration, name, rank
        );
        Ok(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(duration: u32, score: u32, name: &str) -> TimedScoreRecord {
        TimedScoreRecord {
            duration,
            score,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_orders_by_score_then_duration() {
        let mut board = ScoreLeaderboard::new();
        board.push(entry(30, 5, "A"));
        board.push(entry(90, 5, "B"));
        board.push(entry(60, 8, "C"));
        board.push(entry(60, 5, "D"));

        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_ties_keep_recording_order() {
        let mut board = ScoreLeaderboard::new();
        assert_eq!(board.push(entry(30, 7, "Cara")), Some(0));
        assert_eq!(board.push(entry(30, 7, "Dan")), Some(1));

        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Cara", "Dan"]);
    }

    #[test]
    fn test_keeps_top_twenty() {
        let mut board = ScoreLeaderboard::new();
        for score in 0..25 {
            board.push(entry(60, score, &format!("P{score}")));
        }
        assert_eq!(board.len(), MAX_TIMED_SCORES);
        let scores: Vec<_> = board.iter().map(|e| e.score).collect();
        assert_eq!(scores, (5..25).rev().collect::<Vec<_>>());

        assert_eq!(board.push(entry(30, 0, "Late")), None);
        assert!(board.iter().all(|e| e.name != "Late"));
    }

    #[test]
    fn test_same_name_may_appear_twice() {
        let mut board = ScoreLeaderboard::new();
        board.push(entry(30, 3, "Ann"));
        board.push(entry(30, 4, "Ann"));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_best_by_duration() {
        let board = ScoreLeaderboard::from_records(vec![
            entry(30, 2, "Low"),
            entry(30, 9, "High"),
            entry(60, 4, "Mid"),
        ]);
        let best = board.best_by_duration();
        assert_eq!(best[&30].name, "High");
        assert_eq!(best[&60].name, "Mid");
        assert!(!best.contains_key(&90));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LeaderboardStore::new(dir.path().join("time_stats.bin"), XorCodec::default());
        assert!(store.snapshot().is_empty());

        store.record(30, 7, "Cara").unwrap();
        store.record(60, 7, "Dan").unwrap();
        store.record(90, 2, "Eve").unwrap();

        let names: Vec<_> = store.snapshot().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Dan", "Cara", "Eve"]);
    }

    #[test]
    fn test_store_rejects_reserved_name() {
        let dir = TempDir::new().unwrap();
        let store = LeaderboardStore::new(dir.path().join("time_stats.bin"), XorCodec::default());
        assert!(store.record(30, 1, "a:b").is_err());
        assert!(store.snapshot().is_empty());
    }
}
