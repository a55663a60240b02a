//! Envelope encoding
//!
//! Turns a [`LogEnvelope`] into the text frame that goes over the wire.

use relaylog_core::domain::envelope::LogEnvelope;
use thiserror::Error;

/// Errors that can occur while encoding an envelope
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoder refused the envelope
    #[error("Envelope rejected: {0}")]
    Rejected(String),
}

/// Encodes envelopes into text payloads
pub trait EnvelopeEncoder: Send + Sync {
    fn encode(&self, envelope: &LogEnvelope) -> Result<String, EncodeError>;
}

/// Compact JSON encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl EnvelopeEncoder for JsonEncoder {
    fn encode(&self, envelope: &LogEnvelope) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(envelope)?)
    }
}
