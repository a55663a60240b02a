//! Relaylog Client
//!
//! Network side of relaylog: delivering encoded envelopes to a collector,
//! and a small collector that receives them.
//!
//! # Example
//!
//! ```no_run
//! use relaylog_client::{LogTransport, WebSocketTransport};
//!
//! #[tokio::main]
//! async fn main() -> relaylog_client::Result<()> {
//!     let transport = WebSocketTransport::new();
//!
//!     transport
//!         .send_text(
//!             "ws://localhost:8081",
//!             r#"{"type":"log","level":"error","mode":"BRIDGE","data":["boom"]}"#.to_string(),
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod error;
pub mod transport;

// Re-export commonly used types
pub use collector::{CollectedEnvelope, Collector};
pub use error::{Result, TransportError};
pub use transport::{LogTransport, WebSocketTransport};
