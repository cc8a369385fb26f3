//! CLI commands for donegate.

pub mod check;
pub mod config;
pub mod gitignore;
pub mod init;
pub mod log;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// donegate - block completion announcements until the working tree is clean
#[derive(Parser)]
#[command(name = "donegate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as a hook: read one tool event on stdin, print a block record if needed
    Check {
        /// Project root (defaults to the event's cwd, then the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Create .donegate/config.toml and ignore .donegate/ in git
    Init,

    /// Show the effective configuration
    Config,

    /// Show recent gate decisions
    Log {
        /// Number of decisions to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
}
