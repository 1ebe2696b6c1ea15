//! Interactive play on stdin: single games and time attack.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use chrono::Utc;
use owo_colors::OwoColorize;
use rand::thread_rng;
use tracing::{info, warn};
use wordle_store::config::game::STANDARD_GUESSES;
use wordle_store::{
    GameStore, LetterStatus, NameCheck, SessionCategory, SessionState, WordCatalog, WordPick,
    evaluate_guess, is_solved, validate_username,
};

use crate::prompter::CliSlotSelector;

const QUIT_COMMAND: &str = ":quit";
const UNDO_COMMAND: &str = ":undo";
const REDO_COMMAND: &str = ":redo";

/// Where a new game's word comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Daily,
    Infinite,
    Category(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub target: String,
    pub max_guesses: u32,
    pub guesses: Vec<String>,
    pub category: SessionCategory,
    /// Guess lists to return to on undo, most recent last
    undo_stack: Vec<Vec<String>>,
    redo_stack: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    Won,
    Lost,
    Quit,
    TimeUp,
}

impl Round {
    fn from_pick(pick: WordPick, category: SessionCategory) -> Self {
        Self {
            target: pick.word,
            max_guesses: pick.max_guesses,
            guesses: Vec::new(),
            category,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn start(catalog: &WordCatalog, mode: &Mode) -> Result<Self> {
        let round = match mode {
            Mode::Daily => catalog
                .daily_word(Utc::now().date_naive())
                .map(|pick| Self::from_pick(pick, SessionCategory::Daily)),
            Mode::Infinite => catalog
                .standard_word(&mut thread_rng())
                .map(|pick| Self::from_pick(pick, SessionCategory::Infinite)),
            Mode::Category(name) => {
                if catalog.get(name).is_none() {
                    bail!("Unknown category {}", name);
                }
                catalog
                    .random_word(name, &mut thread_rng())
                    .map(|pick| Self::from_pick(pick, SessionCategory::Named(name.clone())))
            }
        };
        match round {
            Some(round) => Ok(round),
            None => bail!("Word catalog is empty"),
        }
    }

    /// Rebuild a paused game. Named categories take their guess allowance
    /// from the catalog when it still lists them.
    pub fn resume(state: SessionState, catalog: &WordCatalog) -> Self {
        let max_guesses = match &state.category {
            SessionCategory::Named(name) => catalog
                .get(name)
                .map(|c| c.difficulty)
                .unwrap_or(STANDARD_GUESSES),
            _ => STANDARD_GUESSES,
        };
        Self {
            target: state.target,
            max_guesses,
            guesses: state.guesses,
            category: state.category,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            target: self.target.clone(),
            guesses: self.guesses.clone(),
            category: self.category.clone(),
        }
    }

    /// Record a submitted guess. Any undone guesses can no longer be redone.
    pub fn submit(&mut self, guess: String) {
        self.undo_stack.push(self.guesses.clone());
        self.redo_stack.clear();
        self.guesses.push(guess);
    }

    /// Take back the last submitted guess. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.guesses, previous);
        self.redo_stack.push(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.guesses, next);
        self.undo_stack.push(current);
        true
    }

    fn is_exhausted(&self) -> bool {
        self.guesses.len() >= self.max_guesses as usize
    }
}

/// Normalise a typed guess, or explain why it can't be used.
fn check_guess_input(input: &str, word_len: usize) -> std::result::Result<String, String> {
    let guess = input.trim().to_ascii_uppercase();
    if !guess.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("Letters only".to_string());
    }
    if guess.chars().count() != word_len {
        return Err(format!("Guess must be {} letters", word_len));
    }
    Ok(guess)
}

pub fn render_feedback(guess: &str, feedback: &[LetterStatus]) -> String {
    guess
        .chars()
        .zip(feedback)
        .map(|(ch, status)| match status {
            LetterStatus::Correct => format!("{}", ch.black().on_green()),
            LetterStatus::Present => format!("{}", ch.black().on_yellow()),
            LetterStatus::Absent => format!("{}", ch.dimmed()),
        })
        .collect()
}

fn render_board<W: Write>(round: &Round, out: &mut W) -> io::Result<()> {
    for guess in &round.guesses {
        writeln!(
            out,
            "{}",
            render_feedback(guess, &evaluate_guess(guess, &round.target))
        )?;
    }
    Ok(())
}

/// Read guesses from `input` until the round is decided, the player types
/// `:quit`, input ends, or `deadline` passes. `:undo` and `:redo` step
/// through the guesses submitted this round.
pub fn play_round<R: BufRead, W: Write>(
    round: &mut Round,
    input: &mut R,
    out: &mut W,
    deadline: Option<Instant>,
) -> io::Result<RoundEnd> {
    render_board(round, out)?;

    let word_len = round.target.chars().count();
    loop {
        if round.is_exhausted() {
            return Ok(RoundEnd::Lost);
        }

        write!(
            out,
            "Guess {}/{}: ",
            round.guesses.len() + 1,
            round.max_guesses
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || line.trim() == QUIT_COMMAND {
            return Ok(RoundEnd::Quit);
        }
        let stepped = match line.trim() {
            UNDO_COMMAND => Some(("undo", round.undo())),
            REDO_COMMAND => Some(("redo", round.redo())),
            _ => None,
        };
        if let Some((action, changed)) = stepped {
            if changed {
                render_board(round, out)?;
            } else {
                writeln!(out, "Nothing to {}", action)?;
            }
            continue;
        }

        let guess = match check_guess_input(&line, word_len) {
            Ok(guess) => guess,
            Err(reason) => {
                writeln!(out, "{}", reason)?;
                continue;
            }
        };

        let feedback = evaluate_guess(&guess, &round.target);
        writeln!(out, "{}", render_feedback(&guess, &feedback))?;
        round.submit(guess);

        if is_solved(&feedback) {
            return Ok(RoundEnd::Won);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(RoundEnd::TimeUp);
        }
    }
}

/// Play one game, resuming the player's paused game if there is one
pub fn run(store: &mut GameStore, name: &str, mode: Mode) -> Result<()> {
    validate_username(name)?;
    let catalog = WordCatalog::load(store.config().words_path())?;

    let mut round = match store.load_session(name) {
        Some(session) => {
            println!("Resuming saved game for {}", name);
            Round::resume(session.state, &catalog)
        }
        None => {
            match store.check_new_name(name) {
                NameCheck::Ranked => println!("Welcome back, {}", name),
                _ => println!("New player: {}", name),
            }
            Round::start(&catalog, &mode)?
        }
    };
    println!(
        "Category: {}  ({} to save and leave, {}/{} to step back and forth)",
        round.category, QUIT_COMMAND, UNDO_COMMAND, REDO_COMMAND
    );

    let started = Instant::now();
    let end = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        play_round(&mut round, &mut input, &mut io::stdout(), None)?
    };

    match end {
        RoundEnd::Quit => {
            if store.save_session_negotiated(name, &round.state(), &CliSlotSelector)? {
                println!("Game saved. Resume any time with the same name.");
            } else {
                println!("Game discarded.");
            }
        }
        end => settle_finished(store, name, &round, end, started.elapsed().as_secs_f64()),
    }
    Ok(())
}

/// Book-keeping for a game that ended without being paused. The win is
/// recorded before the saved game is cleared, and neither failure stops the
/// other.
fn settle_finished(
    store: &mut GameStore,
    name: &str,
    round: &Round,
    end: RoundEnd,
    elapsed: f64,
) {
    if end == RoundEnd::Won {
        println!("{} Solved in {:.1}s", "YOU WIN!".green().bold(), elapsed);
        match store.record_win(name, elapsed, &round.target, &round.guesses) {
            Ok(player) => println!(
                "{} wins, average {:.2}s",
                player.games, player.avg_time
            ),
            Err(e) => warn!("Failed to save stats for {}: {}", name, e),
        }
    } else {
        println!("{} The word was {}", "GAME OVER.".red().bold(), round.target);
    }

    if let Err(e) = store.delete_session(name) {
        warn!("Failed to clear saved game for {}: {}", name, e);
    }
}

/// Random-mix rounds until `duration` seconds have passed
pub fn run_time_attack(store: &GameStore, name: &str, duration: u32) -> Result<()> {
    validate_username(name)?;
    let catalog = WordCatalog::load(store.config().words_path())?;
    if catalog.is_empty() {
        bail!("Word catalog is empty");
    }

    let deadline = Instant::now() + Duration::from_secs(u64::from(duration));
    let mut rng = thread_rng();
    let mut score = 0u32;
    {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();

        loop {
            let Some(pick) = catalog.random_mix(&mut rng) else {
                bail!("Word catalog is empty");
            };
            let category = SessionCategory::Named(pick.category.clone().unwrap_or_default());
            let mut round = Round::from_pick(pick, category);
            let remaining = deadline.saturating_duration_since(Instant::now());
            println!("Category: {}  ({}s left)", round.category, remaining.as_secs());

            match play_round(&mut round, &mut input, &mut out, Some(deadline))? {
                RoundEnd::Won => {
                    score += 1;
                    println!("{}", "CORRECT!".green());
                }
                RoundEnd::Lost => println!("MISSED! It was {}", round.target),
                RoundEnd::TimeUp => break,
                RoundEnd::Quit => {
                    println!("Time attack abandoned, score not recorded.");
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                break;
            }
        }
    }

    println!("Time's up! Score: {}", score);
    info!("Time attack over for {}: {} in {}s", name, score, duration);
    match store.record_timed(duration, score, name)? {
        Some(rank) => println!("Leaderboard position #{}", rank + 1),
        None => println!("Not in the top 20 this time."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;
    use wordle_store::StoreConfig;

    fn round(target: &str, max_guesses: u32) -> Round {
        Round {
            target: target.to_string(),
            max_guesses,
            guesses: Vec::new(),
            category: SessionCategory::Infinite,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    fn play(round: &mut Round, input: &str, deadline: Option<Instant>) -> RoundEnd {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        play_round(round, &mut input, &mut out, deadline).unwrap()
    }

    #[test]
    fn test_win_after_guesses() {
        let mut r = round("CRANE", 6);
        assert_eq!(play(&mut r, "slate\ncrane\n", None), RoundEnd::Won);
        assert_eq!(r.guesses, vec!["SLATE", "CRANE"]);
    }

    #[test]
    fn test_invalid_input_is_not_counted() {
        let mut r = round("CRANE", 6);
        assert_eq!(play(&mut r, "abc\nab1de\ncrane\n", None), RoundEnd::Won);
        assert_eq!(r.guesses.len(), 1);
    }

    #[test]
    fn test_quit_keeps_progress() {
        let mut r = round("CRANE", 6);
        assert_eq!(play(&mut r, "slate\n:quit\n", None), RoundEnd::Quit);
        assert_eq!(r.state().guesses, vec!["SLATE"]);
    }

    #[test]
    fn test_end_of_input_quits() {
        let mut r = round("CRANE", 6);
        assert_eq!(play(&mut r, "", None), RoundEnd::Quit);
    }

    #[test]
    fn test_out_of_guesses() {
        let mut r = round("CRANE", 2);
        assert_eq!(play(&mut r, "slate\nghost\ncrane\n", None), RoundEnd::Lost);
        assert_eq!(r.guesses.len(), 2);
    }

    #[test]
    fn test_deadline_passed() {
        let mut r = round("CRANE", 6);
        let deadline = Instant::now();
        assert_eq!(play(&mut r, "slate\nslate\n", Some(deadline)), RoundEnd::TimeUp);
        assert_eq!(r.guesses.len(), 1);
    }

    #[test]
    fn test_undo_and_redo_guesses() {
        let mut r = round("CRANE", 6);
        let input = "slate\nghost\n:undo\n:undo\n:redo\n:quit\n";
        assert_eq!(play(&mut r, input, None), RoundEnd::Quit);
        assert_eq!(r.guesses, vec!["SLATE"]);

        assert!(r.redo());
        assert_eq!(r.guesses, vec!["SLATE", "GHOST"]);
        assert!(!r.redo());
    }

    #[test]
    fn test_new_guess_clears_redo() {
        let mut r = round("CRANE", 6);
        let input = "slate\nghost\n:undo\nplant\n:redo\n:quit\n";
        assert_eq!(play(&mut r, input, None), RoundEnd::Quit);
        assert_eq!(r.guesses, vec!["SLATE", "PLANT"]);

        assert!(r.undo());
        assert!(r.undo());
        assert!(r.guesses.is_empty());
        assert!(!r.undo());
    }

    #[test]
    fn test_undo_frees_a_guess() {
        let mut r = round("CRANE", 2);
        let input = "slate\n:undo\nghost\ncrane\n";
        assert_eq!(play(&mut r, input, None), RoundEnd::Won);
        assert_eq!(r.guesses, vec!["GHOST", "CRANE"]);
    }

    #[test]
    fn test_resumed_guesses_cannot_be_undone() {
        let state = SessionState {
            target: "CRANE".to_string(),
            guesses: vec!["SLATE".to_string()],
            category: SessionCategory::Infinite,
        };
        let mut r = Round::resume(state, &WordCatalog::default());
        assert!(!r.undo());
        assert_eq!(r.guesses.len(), 1);
    }

    #[test]
    fn test_win_recorded_when_sessions_unreadable() {
        let dir = TempDir::new().unwrap();
        let mut store = GameStore::open(StoreConfig::with_data_dir(dir.path()));
        std::fs::create_dir(store.config().sessions_path()).unwrap();

        let mut r = round("CRANE", 6);
        r.submit("CRANE".to_string());
        settle_finished(&mut store, "Ann", &r, RoundEnd::Won, 12.0);

        let ann = store.find_player("Ann").unwrap();
        assert_eq!(ann.games, 1);
        assert_eq!(ann.last_guesses, vec!["CRANE"]);
    }

    #[test]
    fn test_finished_game_clears_session() {
        let dir = TempDir::new().unwrap();
        let mut store = GameStore::open(StoreConfig::with_data_dir(dir.path()));
        let r = round("CRANE", 6);
        store.save_session("Ann", &r.state(), None).unwrap();

        settle_finished(&mut store, "Ann", &r, RoundEnd::Lost, 30.0);
        assert!(store.load_session("Ann").is_none());
        assert!(store.find_player("Ann").is_none());
    }

    #[test]
    fn test_resume_uses_catalog_allowance() {
        let catalog = WordCatalog::parse("Food|4|bread");
        let state = SessionState {
            target: "BREAD".to_string(),
            guesses: vec!["SLATE".to_string()],
            category: SessionCategory::Named("Food".to_string()),
        };
        let resumed = Round::resume(state, &catalog);
        assert_eq!(resumed.max_guesses, 4);
        assert_eq!(resumed.guesses.len(), 1);

        let daily = SessionState {
            target: "CRANE".to_string(),
            guesses: Vec::new(),
            category: SessionCategory::Daily,
        };
        assert_eq!(Round::resume(daily, &catalog).max_guesses, STANDARD_GUESSES);
    }

    #[test]
    fn test_start_modes() {
        let catalog = WordCatalog::parse("Food|4|bread");
        let r = Round::start(&catalog, &Mode::Category("Food".to_string())).unwrap();
        assert_eq!(r.target, "BREAD");
        assert_eq!(r.max_guesses, 4);

        let daily = Round::start(&catalog, &Mode::Daily).unwrap();
        assert_eq!(daily.category, SessionCategory::Daily);

        assert!(Round::start(&catalog, &Mode::Category("Cars".to_string())).is_err());
        assert!(Round::start(&WordCatalog::default(), &Mode::Infinite).is_err());
    }
}
