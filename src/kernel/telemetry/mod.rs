//! Recorded-sample schema and conditional persistence.
//!
//! # SCHEMA INVARIANT
//! The sample field list is built ONCE at session start from configuration
//! flags and is fixed for the session's lifetime. Field order and naming are
//! a persistence contract: training-side consumers index recorded tubs by
//! this exact layout.
//!
//! # DECISION INVARIANT
//! Telemetry is a side-effect layer. The recording flag is produced by the
//! gating logic upstream; nothing in here feeds back into arbitration.

pub mod gate;
pub mod sample;
pub mod schema;

pub use gate::{MemoryTub, TelemetryGate, TubWriter};
pub use sample::{FieldValue, Sample};
pub use schema::{FieldKind, SampleField, SampleSchema};
