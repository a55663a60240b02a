//! Error types for the relaylog client

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while delivering or collecting envelopes
#[derive(Debug, Error)]
pub enum TransportError {
    /// WebSocket handshake with the collector failed
    #[error("Failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },

    /// Connection was established but the frame could not be written
    #[error("Failed to send frame: {0}")]
    Send(#[source] tungstenite::Error),

    /// Could not start an async runtime to drive the send
    #[error("Failed to start transport runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Socket-level failure on the collector side
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Check if this error happened before any bytes reached the collector
    pub fn is_connect_error(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Runtime(_))
    }
}
