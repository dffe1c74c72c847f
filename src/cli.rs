//! Command-line interface for tictactoe.

use clap::{Parser, Subcommand};

/// Tic-tac-toe with persisted history and statistics
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe with persisted history and statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Directory for stored state (overrides config and TICTACTOE_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<std::path::PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal (1-9 to move, n new game, u undo, q quit)
    Play,

    /// Show statistics
    Stats,

    /// Show finished games
    History {
        /// Only show the most recent N games
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Reset statistics and history
    ResetStats {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}
