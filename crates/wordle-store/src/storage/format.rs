//! Flat, delimiter-based text format for the persisted collections.
//!
//! - Players: one record per line,
//!   `name:<s>|avg_time:<f>|games:<i>|total_time:<f>|word:<s>|guesses:<csv>`
//! - Sessions: one record per line, `username|target|g1,g2,...|category`
//! - Timed scores: records joined by `|`, each `duration:score:name`
//!
//! The format has no escaping. Fields that would contain a delimiter are
//! rejected by [`validate_username`] and [`validate_field`] before anything
//! is written. Decoding is lenient: a malformed record is skipped, and a
//! numeric field that fails to parse reads as zero.

use std::str::FromStr;

use tracing::warn;

use crate::config::limits::MAX_USERNAME_LEN;
use crate::error::{Error, Result};

use super::{PlayerRecord, SessionCategory, SessionRecord, SessionState, TimedScoreRecord};

/// Characters that carry structure somewhere in the format
pub const RESERVED_CHARS: [char; 5] = ['|', ':', ',', '\n', '\r'];

pub fn validate_username(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.chars().count() > MAX_USERNAME_LEN {
        "must be at most 12 characters"
    } else if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        "must contain only letters and digits"
    } else {
        return Ok(());
    };

    Err(Error::InvalidUsername {
        name: name.to_string(),
        reason,
    })
}

pub fn validate_field(field: &'static str, value: &str) -> Result<()> {
    if value.contains(RESERVED_CHARS) {
        return Err(Error::ReservedCharacter {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_or_zero<T: FromStr + Default>(value: &str) -> T {
    value.trim().parse().unwrap_or_default()
}

fn parse_seconds(value: &str) -> f64 {
    let secs: f64 = parse_or_zero(value);
    if secs.is_finite() { secs } else { 0.0 }
}

fn split_guesses(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

// Players

pub fn encode_player(record: &PlayerRecord) -> String {
    format!(
        "name:{}|avg_time:{}|games:{}|total_time:{}|word:{}|guesses:{}",
        record.name,
        record.avg_time,
        record.games,
        record.total_time,
        record.last_word,
        record.last_guesses.join(",")
    )
}

/// Decode one player line. Returns `None` when the line has no usable name.
pub fn decode_player(line: &str) -> Option<PlayerRecord> {
    let mut record = PlayerRecord::default();
    let mut has_name = false;

    for part in line.split('|') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        match key {
            "name" => {
                record.name = value.to_string();
                has_name = !value.is_empty();
            }
            "avg_time" => record.avg_time = parse_seconds(value),
            "total_time" => record.total_time = parse_seconds(value),
            "games" => record.games = parse_or_zero(value),
            "word" => record.last_word = value.to_string(),
            "guesses" => record.last_guesses = split_guesses(value),
            _ => {}
        }
    }

    has_name.then_some(record)
}

pub fn encode_players(records: &[PlayerRecord]) -> String {
    records
        .iter()
        .map(encode_player)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn decode_players(text: &str) -> Vec<PlayerRecord> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let record = decode_player(line);
            if record.is_none() {
                warn!("Skipping malformed player record: {:?}", line);
            }
            record
        })
        .collect()
}

// Timed scores

pub fn encode_timed_scores(records: &[TimedScoreRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}:{}:{}", r.duration, r.score, r.name))
        .collect::<Vec<_>>()
        .join("|")
}

pub fn decode_timed_scores(text: &str) -> Vec<TimedScoreRecord> {
    text.split('|')
        .filter(|chunk| !chunk.trim().is_empty())
        .filter_map(|chunk| {
            let segments: Vec<&str> = chunk.splitn(3, ':').collect();
            match segments.as_slice() {
                [duration, score, name] => Some(TimedScoreRecord {
                    duration: parse_or_zero(duration),
                    score: parse_or_zero(score),
                    name: name.trim_end_matches(['\n', '\r']).to_string(),
                }),
                _ => {
                    warn!("Skipping malformed timed score: {:?}", chunk);
                    None
                }
            }
        })
        .collect()
}

// Sessions

pub fn encode_session(record: &SessionRecord) -> String {
    format!(
        "{}|{}|{}|{}",
        record.username,
        record.state.target,
        record.state.guesses.join(","),
        record.state.category
    )
}

pub fn decode_session(line: &str) -> Option<SessionRecord> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < 4 || fields[0].is_empty() {
        return None;
    }

    Some(SessionRecord {
        username: fields[0].to_string(),
        state: SessionState {
            target: fields[1].to_string(),
            guesses: split_guesses(fields[2]),
            category: SessionCategory::from(fields[3]),
        },
    })
}

pub fn encode_sessions(records: &[SessionRecord]) -> String {
    records
        .iter()
        .map(encode_session)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn decode_sessions(text: &str) -> Vec<SessionRecord> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let record = decode_session(line);
            if record.is_none() {
                warn!("Skipping malformed session record: {:?}", line);
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PlayerRecord {
        PlayerRecord {
            name: "Alice".to_string(),
            games: 2,
            total_time: 30.0,
            avg_time: 15.0,
            last_word: "CRANE".to_string(),
            last_guesses: vec!["SLATE".to_string(), "CRANE".to_string()],
        }
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("Alice").is_ok());
        assert!(validate_username("abc123XYZ789").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("abcdefghijklm").is_err());
        assert!(validate_username("bad|name").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_validate_field() {
        assert!(validate_field("target", "CRANE").is_ok());
        for bad in ["A|B", "A:B", "A,B", "A\nB"] {
            let err = validate_field("target", bad).unwrap_err();
            assert!(matches!(err, Error::ReservedCharacter { field: "target", .. }));
        }
    }

    #[test]
    fn test_player_line_layout() {
        assert_eq!(
            encode_player(&alice()),
            "name:Alice|avg_time:15|games:2|total_time:30|word:CRANE|guesses:SLATE,CRANE"
        );
        assert_eq!(decode_player(&encode_player(&alice())), Some(alice()));
    }

    #[test]
    fn test_decode_player_from_legacy_floats() {
        let line = "name:Bob|avg_time:5.0|games:1|total_time:5.0|word:N/A|guesses:";
        let record = decode_player(line).unwrap();
        assert_eq!(record.name, "Bob");
        assert_eq!(record.avg_time, 5.0);
        assert_eq!(record.last_word, "N/A");
        assert!(record.last_guesses.is_empty());
    }

    #[test]
    fn test_decode_player_bad_numbers_default_to_zero() {
        let record = decode_player("name:Eve|avg_time:fast|games:many|total_time:NaN").unwrap();
        assert_eq!(record.games, 0);
        assert_eq!(record.avg_time, 0.0);
        assert_eq!(record.total_time, 0.0);
    }

    #[test]
    fn test_decode_players_skips_garbage() {
        let text = format!("{}\ngarbage without delimiters\n\n", encode_player(&alice()));
        let records = decode_players(&text);
        assert_eq!(records, vec![alice()]);
    }

    #[test]
    fn test_timed_scores_layout() {
        let records = vec![
            TimedScoreRecord {
                duration: 60,
                score: 9,
                name: "Cara".to_string(),
            },
            TimedScoreRecord {
                duration: 30,
                score: 4,
                name: "Dan".to_string(),
            },
        ];
        let text = encode_timed_scores(&records);
        assert_eq!(text, "60:9:Cara|30:4:Dan");
        assert_eq!(decode_timed_scores(&text), records);
    }

    #[test]
    fn test_decode_timed_scores_lenient() {
        let records = decode_timed_scores("30:5:Ann|junk|90:x:Ben|");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Ann");
        assert_eq!(records[1].duration, 90);
        assert_eq!(records[1].score, 0);
    }

    #[test]
    fn test_session_layout() {
        let record = SessionRecord {
            username: "Zed".to_string(),
            state: SessionState {
                target: "PLANT".to_string(),
                guesses: vec!["SLATE".to_string(), "PRINT".to_string()],
                category: SessionCategory::Named("Nature".to_string()),
            },
        };
        let line = encode_session(&record);
        assert_eq!(line, "Zed|PLANT|SLATE,PRINT|Nature");
        assert_eq!(decode_session(&line), Some(record));
    }

    #[test]
    fn test_decode_session_without_guesses() {
        let record = decode_session("Zed|PLANT||WORDLE").unwrap();
        assert!(record.state.guesses.is_empty());
        assert_eq!(record.state.category, SessionCategory::Daily);
    }

    #[test]
    fn test_decode_sessions_skips_short_lines() {
        let records = decode_sessions("Zed|PLANT||INFINITE\nbroken|line\n|X||WORDLE");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state.category, SessionCategory::Infinite);
    }
}
