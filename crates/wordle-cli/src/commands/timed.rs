//! Time-attack leaderboard commands.

use anyhow::Result;
use owo_colors::OwoColorize;
use wordle_store::GameStore;
use wordle_store::config::game::TIMED_DURATIONS;

/// Accept only the offered round lengths
pub fn parse_duration(value: &str) -> Result<u32, String> {
    let secs: u32 = value
        .parse()
        .map_err(|_| format!("{} is not a number of seconds", value))?;
    if TIMED_DURATIONS.contains(&secs) {
        Ok(secs)
    } else {
        Err(format!("duration must be one of {:?}", TIMED_DURATIONS))
    }
}

pub fn run_list(store: &GameStore, json: bool) -> Result<()> {
    let scores = store.timed_scores();

    if json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
        return Ok(());
    }

    println!("{}", "TIME ATTACK".bold());
    let best = store.best_timed_by_duration();
    for duration in TIMED_DURATIONS {
        match best.get(&duration) {
            Some(entry) => println!("  Best {}s: {} by {}", duration, entry.score, entry.name),
            None => println!("  Best {}s: -", duration),
        }
    }

    println!("{:>3}  {:<12} {:>6} {:>6}", "#", "Name", "Score", "Time");
    for (i, entry) in scores.iter().enumerate() {
        println!(
            "{:>3}  {:<12} {:>6} {:>5}s",
            i + 1,
            entry.name,
            entry.score,
            entry.duration
        );
    }
    Ok(())
}

pub fn run_record(store: &GameStore, duration: u32, score: u32, name: &str) -> Result<()> {
    match store.record_timed(duration, score, name)? {
        Some(rank) => println!("Recorded at #{}", rank + 1),
        None => println!("Recorded, but not in the top 20"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("60"), Ok(60));
        assert!(parse_duration("45").is_err());
        assert!(parse_duration("abc").is_err());
    }
}
