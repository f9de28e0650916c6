//! FHIR record handling for Carevault.
//!
//! Incoming records are loosely structured JSON objects. This crate does not validate them
//! against a FHIR profile; it only lifts out the handful of fields the service reports on.
//!
//! Records are modelled as an open [`serde_json::Map`] rather than a typed resource so that any
//! extra or missing keys are tolerated.

pub mod summary;

pub use summary::{extract_summary, RecordSummary};

/// JSON object as received on the wire.
pub type Record = serde_json::Map<String, serde_json::Value>;
