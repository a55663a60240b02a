//! Configuration module
//!
//! Handles CLI configuration shared by all commands.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the collector that `send` and `error` deliver to
    pub url: String,
}
