//! Ranked player commands.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use wordle_store::{GameStore, evaluate_guess};

use super::play::render_feedback;

/// Print the ranked directory
pub fn run_list(store: &GameStore, json: bool) -> Result<()> {
    let players = store.ranked_players();

    if json {
        println!("{}", serde_json::to_string_pretty(&players)?);
        return Ok(());
    }

    if players.is_empty() {
        println!("No ranked players yet.");
        return Ok(());
    }

    println!("{}", "RANKED PLAYERS".bold());
    println!("{:>3}  {:<12} {:>6} {:>10}", "#", "Name", "Wins", "Avg (s)");
    for (i, player) in players.iter().enumerate() {
        println!(
            "{:>3}  {:<12} {:>6} {:>10.2}",
            i + 1,
            player.name,
            player.games,
            player.avg_time
        );
    }
    Ok(())
}

/// Print a player's last winning word and the guesses that led to it
pub fn run_history(store: &GameStore, name: &str) -> Result<()> {
    let Some(player) = store.find_player(name) else {
        bail!("No ranked player named {}", name);
    };

    println!("{} {}", "HISTORY:".bold(), player.name);
    println!("Target word: {}", player.last_word.green());
    for (i, guess) in player.last_guesses.iter().enumerate() {
        println!(
            "Guess {}: {}",
            i + 1,
            render_feedback(guess, &evaluate_guess(guess, &player.last_word))
        );
    }
    Ok(())
}
