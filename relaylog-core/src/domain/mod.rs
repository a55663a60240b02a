//! Core domain types
//!
//! These types are shared between the sink (which fills batches and wraps
//! them into envelopes) and the collector side (which decodes envelopes
//! received from the wire).

pub mod batch;
pub mod envelope;
