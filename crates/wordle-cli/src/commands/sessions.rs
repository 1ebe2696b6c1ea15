//! Paused game commands.

use anyhow::Result;
use wordle_store::GameStore;
use wordle_store::config::limits::MAX_SESSIONS;

pub fn run_list(store: &GameStore) -> Result<()> {
    let active = store.active_sessions();
    println!("Saved games ({}/{}):", active.len(), MAX_SESSIONS);
    for name in &active {
        match store.load_session(name) {
            Some(session) => println!(
                "  {:<12} {} guesses, {}",
                name,
                session.state.guesses.len(),
                session.state.category
            ),
            None => println!("  {}", name),
        }
    }
    Ok(())
}

pub fn run_forget(store: &GameStore, name: &str) -> Result<()> {
    if store.delete_session(name)? {
        println!("Removed saved game for {}", name);
    } else {
        println!("{} has no saved game", name);
    }
    Ok(())
}
