//! Sink configuration
//!
//! Defines the endpoint, send timeout and envelope mode for a batcher, with
//! loading from environment variables.

use relaylog_core::domain::envelope::{LogMode, ParseModeError};
use std::time::Duration;
use thiserror::Error;

/// How long a flush waits for the send to complete
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("{name} must be a whole number of milliseconds, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("endpoint must start with ws://, got '{0}'")]
    InvalidEndpoint(String),

    #[error("endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("send_timeout must be greater than 0")]
    ZeroTimeout,

    #[error(transparent)]
    InvalidMode(#[from] ParseModeError),
}

/// Sink configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Collector URL (e.g., "ws://localhost:8081")
    pub endpoint: String,

    /// Upper bound on how long a flush blocks its caller
    pub send_timeout: Duration,

    /// Mode tag written into every envelope
    pub mode: LogMode,
}

impl SinkConfig {
    /// Creates a new configuration with defaults
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
            mode: LogMode::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RELAYLOG_URL (required)
    /// - RELAYLOG_SEND_TIMEOUT_MS (optional, default: 2000)
    /// - RELAYLOG_MODE (optional, BRIDGE or NOBRIDGE, default: BRIDGE)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup("RELAYLOG_URL").ok_or(ConfigError::MissingVar("RELAYLOG_URL"))?;

        let send_timeout = match lookup("RELAYLOG_SEND_TIMEOUT_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "RELAYLOG_SEND_TIMEOUT_MS",
                    value,
                })?,
            None => DEFAULT_SEND_TIMEOUT,
        };

        let mode = match lookup("RELAYLOG_MODE") {
            Some(value) => value.parse()?,
            None => LogMode::default(),
        };

        Ok(Self {
            endpoint,
            send_timeout,
            mode,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        if !self.endpoint.starts_with("ws://") {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }

        if self.send_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}
