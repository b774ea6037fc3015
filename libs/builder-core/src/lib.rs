//! Builder reputation engine
//!
//! Turns raw on-chain signals for an address into a deterministic score,
//! keeps scored builders in an owned [`Registry`], and derives ranked
//! [`Report`]s from it. Nothing in this crate performs I/O.

pub mod engine;
pub mod entity;
pub mod error;
pub mod registry;
pub mod report;
pub mod scoring;

// Re-export commonly used types
pub use engine::BuilderEngine;
pub use entity::{normalize_address, BuilderRecord, BuilderSignals, NetworkStats};
pub use error::EngineError;
pub use registry::Registry;
pub use report::{Report, ReportOptions};
pub use scoring::{BuilderScoreCalculator, BuilderScoreResult, ScoreBreakdown};
