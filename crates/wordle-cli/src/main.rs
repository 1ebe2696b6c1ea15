use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wordle_store::config::DEFAULT_DATA_DIR;
use wordle_store::{GameStore, StoreConfig};

mod commands;
mod prompter;

#[derive(Parser)]
#[command(name = "wordle")]
#[command(about = "Word guessing game with persistent rankings")]
struct Args {
    /// Directory holding the player, session and score files
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the ranked players
    Players {
        #[arg(long)]
        json: bool,
    },
    /// Show a player's last winning game
    History { name: String },
    /// Show the time-attack leaderboard
    Timed {
        #[arg(long)]
        json: bool,
    },
    /// Add a time-attack result by hand
    TimedRecord {
        #[arg(value_parser = commands::timed::parse_duration)]
        duration: u32,
        score: u32,
        name: String,
    },
    /// List paused games
    Sessions,
    /// Drop a paused game
    Forget { name: String },
    /// Play (or resume) one game
    Play {
        name: String,
        /// Pick the word from this catalog category
        #[arg(long, conflicts_with = "infinite")]
        category: Option<String>,
        /// Random word from the whole catalog instead of the daily word
        #[arg(long)]
        infinite: bool,
    },
    /// Solve as many words as possible before the clock runs out
    TimeAttack {
        name: String,
        #[arg(value_parser = commands::timed::parse_duration)]
        duration: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("wordle_store=warn".parse()?)
                .add_directive("wordle_cli=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = StoreConfig::with_data_dir(&args.data_dir);
    debug!("Using data directory {:?}", config.data_dir);
    let mut store = GameStore::open(config);

    match args.command {
        Command::Players { json } => commands::players::run_list(&store, json),
        Command::History { name } => commands::players::run_history(&store, &name),
        Command::Timed { json } => commands::timed::run_list(&store, json),
        Command::TimedRecord {
            duration,
            score,
            name,
        } => commands::timed::run_record(&store, duration, score, &name),
        Command::Sessions => commands::sessions::run_list(&store),
        Command::Forget { name } => commands::sessions::run_forget(&store, &name),
        Command::Play {
            name,
            category,
            infinite,
        } => {
            let mode = match (category, infinite) {
                (Some(category), _) => commands::play::Mode::Category(category),
                (None, true) => commands::play::Mode::Infinite,
                (None, false) => commands::play::Mode::Daily,
            };
            commands::play::run(&mut store, &name, mode)
        }
        Command::TimeAttack { name, duration } => {
            commands::play::run_time_attack(&store, &name, duration)
        }
    }
}
