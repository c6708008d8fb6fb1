//! Command-line interface for bribe_the_scale.

use clap::{Parser, Subcommand};

/// Bribe the Scale - weight-window guessing game judged by an LLM
#[derive(Parser, Debug)]
#[command(name = "bribe_the_scale")]
#[command(about = "Turn resolution engine and HTTP server for Bribe the Scale", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to a game config TOML file (defaults are used if omitted)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
}
