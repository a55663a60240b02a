//! Relaylog CLI
//!
//! Command-line interface for sending diagnostic logs to a collector and for
//! running a collector locally.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "relaylog")]
#[command(about = "Ship diagnostic logs to a remote collector", long_about = None)]
struct Cli {
    /// Collector URL
    #[arg(long, env = "RELAYLOG_URL", default_value = "ws://localhost:8081")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "relaylog_cli=info,relaylog_sink=info,relaylog_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config { url: cli.url };

    handle_command(cli.command, &config).await
}
