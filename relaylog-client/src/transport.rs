//! Log transports
//!
//! A transport delivers one encoded envelope to an endpoint. Every call is a
//! fresh session: nothing is kept open between sends.

use async_trait::async_trait;
use futures_util::SinkExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use crate::error::{Result, TransportError};

/// Delivers encoded envelopes to a remote collector
#[async_trait]
pub trait LogTransport: Send + Sync {
    /// Sends `payload` as a single text message to `endpoint`
    ///
    /// Resolves once the message has been handed to the connection, or with
    /// an error if the connection or the write failed.
    async fn send_text(&self, endpoint: &str, payload: String) -> Result<()>;
}

/// WebSocket implementation of LogTransport
///
/// Opens a connection, writes one text frame, then closes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogTransport for WebSocketTransport {
    async fn send_text(&self, endpoint: &str, payload: String) -> Result<()> {
        let (mut stream, _response) = connect_async(endpoint).await.map_err(|source| {
            TransportError::Connect {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        stream
            .send(Message::text(payload))
            .await
            .map_err(TransportError::Send)?;

        // The frame is already written; a failed close handshake loses nothing.
        if let Err(e) = stream.close(None).await {
            debug!("Close handshake with {} failed: {}", endpoint, e);
        }

        Ok(())
    }
}
