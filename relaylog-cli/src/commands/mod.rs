//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod listen;
mod send;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send one or more messages as a single batch
    Send {
        /// Messages, recorded in order
        #[arg(required = true)]
        messages: Vec<String>,
    },
    /// Send an error with its stack trace
    Error {
        /// Error description
        description: String,

        /// Stack frame (repeatable, in order)
        #[arg(long = "frame")]
        frames: Vec<String>,
    },
    /// Run a collector and print received envelopes
    Listen {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8081")]
        addr: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Send { messages } => send::send_messages(config, messages).await,
        Commands::Error {
            description,
            frames,
        } => send::send_error(config, description, frames).await,
        Commands::Listen { addr } => listen::run_collector(&addr).await,
    }
}
