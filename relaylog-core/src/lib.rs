//! Relaylog Core
//!
//! Core types for shipping diagnostic logs to a remote collector.
//!
//! This crate contains:
//! - Domain types: the pending log batch and the wire envelope
//!
//! It is shared by the sink (which builds envelopes) and the client
//! (which carries and decodes them).

pub mod domain;
