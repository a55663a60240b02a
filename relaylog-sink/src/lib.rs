//! Relaylog Sink
//!
//! Best-effort shipping of diagnostic logs to a remote collector.
//!
//! A [`RemoteLogBatcher`] buffers lines in memory and, on [`flush`], sends
//! them as one envelope over a fresh WebSocket connection. The flush blocks
//! for at most the configured send timeout (2 seconds by default) and never
//! reports failure to the caller.
//!
//! # Example
//!
//! ```no_run
//! use relaylog_sink::RemoteLogBatcher;
//!
//! let mut batcher = RemoteLogBatcher::new("ws://localhost:8081");
//! batcher.record_message("bundle failed to load");
//! batcher.record_error("TypeError: undefined is not a function", &["at main.js:1:1"]);
//! batcher.flush();
//! assert_eq!(batcher.pending(), 0);
//! ```
//!
//! [`flush`]: RemoteLogBatcher::flush

pub mod batcher;
pub mod config;
pub mod encoder;
pub mod panic_hook;
pub mod wait;

// Re-export commonly used types
pub use batcher::{RemoteLogBatcher, RemoteLogBatcherBuilder};
pub use config::{ConfigError, SinkConfig};
pub use encoder::{EncodeError, EnvelopeEncoder, JsonEncoder};
pub use panic_hook::install_panic_hook;
pub use relaylog_core::domain::envelope::{LogEnvelope, LogLevel, LogMode};
