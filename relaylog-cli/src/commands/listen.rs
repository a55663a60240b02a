//! Listen command handler
//!
//! Runs a collector and prints every envelope it receives until Ctrl-C.

use anyhow::{Context, Result};
use colored::*;
use relaylog_client::{CollectedEnvelope, Collector};
use relaylog_core::domain::envelope::LogLevel;
use tracing::info;

/// Run a collector on `addr`
pub async fn run_collector(addr: &str) -> Result<()> {
    let (collector, mut rx) = Collector::bind(addr)
        .await
        .with_context(|| format!("Failed to bind collector on {}", addr))?;

    println!("{} {}", "Listening on".bold(), collector.url().cyan());
    println!("{}", "Press Ctrl-C to stop.".dimmed());
    println!();

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(collected) => println!("{}", format_collected(&collected)),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping collector");
                break;
            }
        }
    }

    Ok(())
}

/// Format a received envelope for terminal output
fn format_collected(collected: &CollectedEnvelope) -> String {
    let envelope = &collected.envelope;
    let level = match envelope.level {
        LogLevel::Debug => "DEBUG".dimmed(),
        LogLevel::Info => "INFO".blue(),
        LogLevel::Warn => "WARN".yellow(),
        LogLevel::Error => "ERROR".red().bold(),
    };

    let mut out = format!(
        "{} {} {} {}",
        collected
            .received_at
            .format("%H:%M:%S%.3f")
            .to_string()
            .dimmed(),
        level,
        format!("[{}]", envelope.mode).magenta(),
        collected.peer.to_string().dimmed()
    );

    for item in &envelope.data {
        for line in item.lines() {
            out.push_str("\n  ");
            out.push_str(line);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use relaylog_core::domain::envelope::{LogEnvelope, LogMode};

    #[test]
    fn test_format_collected() {
        colored::control::set_override(false);

        let collected = CollectedEnvelope {
            peer: "127.0.0.1:50000".parse().unwrap(),
            received_at: Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 5).unwrap(),
            envelope: LogEnvelope::error(LogMode::Bridge, "Boom\n  frame1\n  frame2"),
        };

        assert_eq!(
            format_collected(&collected),
            "09:30:05.000 ERROR [BRIDGE] 127.0.0.1:50000\n  Boom\n    frame1\n    frame2"
        );
    }
}
