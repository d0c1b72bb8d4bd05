//! Squad CLI - play the game and manage the leaderboard.

// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Squad - power up the hero squad without starving anyone or deadlocking the pool
#[derive(Parser, Debug)]
#[command(name = "squad")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play in the terminal
    Play {
        /// Random seed for the power-up pools (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Seconds on the clock each round (default: 60)
        #[arg(long, default_value = "60")]
        seconds: u32,

        /// Leaderboard file (default: ~/.squad/highscores.json)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Keep the leaderboard in memory only
        #[arg(long, conflicts_with = "scores")]
        no_save: bool,
    },

    /// Print the leaderboard
    Scores {
        /// Leaderboard file (default: ~/.squad/highscores.json)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ScoresFormat,
    },

    /// Delete the leaderboard
    ClearScores {
        /// Leaderboard file (default: ~/.squad/highscores.json)
        #[arg(long)]
        scores: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            seed,
            seconds,
            scores,
            no_save,
        } => {
            // The TUI owns the terminal, so logs go to a file
            cli::telemetry::init(cli::telemetry::LogTarget::DataDir);
            cli::play::execute(seed, seconds, scores, no_save)
        }

        Commands::Scores { scores, format } => {
            cli::telemetry::init(cli::telemetry::LogTarget::Stderr);
            cli::scores::execute(scores, format)
        }

        Commands::ClearScores { scores } => {
            cli::telemetry::init(cli::telemetry::LogTarget::Stderr);
            cli::scores::clear(scores)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
