//! Envelope collector
//!
//! A minimal WebSocket server that receives log envelopes, the way a
//! development server would on the other end of a sink. Every decoded
//! envelope is forwarded to a channel owned by the caller.

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use relaylog_core::domain::envelope::LogEnvelope;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Pause after a failed accept (e.g. out of file descriptors) before retrying
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// An envelope received by the collector
#[derive(Debug, Clone)]
pub struct CollectedEnvelope {
    pub peer: SocketAddr,
    pub received_at: DateTime<Utc>,
    pub envelope: LogEnvelope,
}

/// Running collector; stops accepting connections when dropped
pub struct Collector {
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
}

impl Collector {
    /// Binds the collector and starts accepting connections
    ///
    /// # Returns
    /// The running collector and the receiving end of its envelope channel
    pub async fn bind(
        addr: impl ToSocketAddrs,
    ) -> Result<(Self, mpsc::UnboundedReceiver<CollectedEnvelope>)> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let (tx, rx) = mpsc::unbounded_channel();

        info!("Collector listening on {}", local_addr);

        let accept_task = tokio::spawn(accept_loop(listener, tx));

        Ok((
            Self {
                local_addr,
                accept_task,
            },
            rx,
        ))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// WebSocket URL a sink can use to reach this collector
    pub fn url(&self) -> String {
        format!("ws://{}", self.local_addr)
    }
}

impl Drop for Collector {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn accept_loop(listener: TcpListener, tx: mpsc::UnboundedSender<CollectedEnvelope>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };

        if tx.is_closed() {
            debug!("Envelope receiver dropped, stopping collector");
            return;
        }

        tokio::spawn(handle_connection(stream, peer, tx.clone()));
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    tx: mpsc::UnboundedSender<CollectedEnvelope>,
) {
    let mut ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", peer, e);
            return;
        }
    };

    debug!("Accepted connection from {}", peer);

    while let Some(msg) = ws.next().await {
        match msg {
            Ok(Message::Text(text)) => match decode_envelope(text.as_str()) {
                Some(envelope) => {
                    let collected = CollectedEnvelope {
                        peer,
                        received_at: Utc::now(),
                        envelope,
                    };
                    if tx.send(collected).is_err() {
                        return;
                    }
                }
                None => warn!("Skipping undecodable frame from {}", peer),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Connection with {} ended: {}", peer, e);
                break;
            }
        }
    }
}

fn decode_envelope(text: &str) -> Option<LogEnvelope> {
    serde_json::from_str(text).ok()
}
