//! Log envelope types
//!
//! The envelope is the single JSON object sent to the collector per flush.
//! Field order is fixed: `type`, `level`, `mode`, `data`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire message sent to a remote log collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEnvelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub level: LogLevel,
    pub mode: LogMode,
    pub data: Vec<String>,
}

impl LogEnvelope {
    /// Creates an error-level log envelope carrying a single payload string
    pub fn error(mode: LogMode, payload: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Log,
            level: LogLevel::Error,
            mode,
            data: vec![payload.into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// Which side of the application runtime produced the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogMode {
    /// Logs emitted through the native bridge
    #[default]
    #[serde(rename = "BRIDGE")]
    Bridge,
    #[serde(rename = "NOBRIDGE")]
    NoBridge,
}

impl LogMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogMode::Bridge => "BRIDGE",
            LogMode::NoBridge => "NOBRIDGE",
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log mode '{0}' (expected BRIDGE or NOBRIDGE)")]
pub struct ParseModeError(pub String);

impl FromStr for LogMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("BRIDGE") {
            Ok(LogMode::Bridge)
        } else if s.eq_ignore_ascii_case("NOBRIDGE") {
            Ok(LogMode::NoBridge)
        } else {
            Err(ParseModeError(s.to_string()))
        }
    }
}
