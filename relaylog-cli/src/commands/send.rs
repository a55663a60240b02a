//! Send command handlers
//!
//! Records the given lines in a batcher and flushes them once. Delivery is
//! best effort, so these commands only fail on invalid configuration.

use anyhow::{Context, Result};
use colored::*;
use relaylog_sink::{RemoteLogBatcher, SinkConfig};

use crate::config::Config;

/// Send free-text messages as one batch
pub async fn send_messages(config: &Config, messages: Vec<String>) -> Result<()> {
    let mut batcher = batcher_for(config)?;
    for message in messages {
        batcher.record_message(message);
    }
    flush(batcher).await
}

/// Send a single error and its stack frames
pub async fn send_error(config: &Config, description: String, frames: Vec<String>) -> Result<()> {
    let mut batcher = batcher_for(config)?;
    batcher.record_error(description, &frames);
    flush(batcher).await
}

fn batcher_for(config: &Config) -> Result<RemoteLogBatcher> {
    RemoteLogBatcher::from_config(SinkConfig::new(config.url.clone()))
        .with_context(|| format!("Invalid collector URL '{}'", config.url))
}

async fn flush(mut batcher: RemoteLogBatcher) -> Result<()> {
    let count = batcher.pending();
    batcher.flush_async().await;

    println!(
        "{} {} entr{} to {}",
        "✓".green(),
        "Flushed".bold(),
        if count == 1 { "y" } else { "ies" },
        batcher.endpoint().cyan()
    );
    println!("{}", "  Delivery is best effort; check the collector.".dimmed());

    Ok(())
}
