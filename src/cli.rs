//! Command-line interface for minimax_server.

use clap::{Parser, Subcommand};
use minimax_tictactoe::Board;
use std::path::PathBuf;

/// Minimax Server - perfect-play tic-tac-toe AI with explainable search
#[derive(Parser, Debug)]
#[command(name = "minimax_server")]
#[command(about = "Tic-tac-toe AI over HTTP, with minimax explanation trees", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (defaults apply if it is missing)
    #[arg(short, long, global = true, default_value = "minimax.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Plies included in explanation trees
        #[arg(long)]
        explain_depth: Option<u8>,
    },

    /// Print the AI's reply to a board, e.g. `xxvoovvvv`
    Move {
        /// Board as nine x/o/v characters or a JSON array
        board: Board,
    },

    /// Print the explanation tree for a board as JSON
    Explain {
        /// Board as nine x/o/v characters or a JSON array
        board: Board,

        /// Plies included in the tree (overrides the config)
        #[arg(short, long)]
        depth: Option<u8>,
    },

    /// Print the status token of a board
    Status {
        /// Board as nine x/o/v characters or a JSON array
        board: Board,
    },
}
