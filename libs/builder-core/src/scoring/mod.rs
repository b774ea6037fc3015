//! Builder scoring module
//!
//! Scores an address from its activity signals:
//! - Transactions: 1 point each
//! - Balance: 1 point per 0.1 native unit
//! - Contracts: 50 points per deployed contract
//! - Recency: 0-100 points depending on days since last activity

pub mod builder_score;

pub use builder_score::{BuilderScoreCalculator, BuilderScoreResult, ScoreBreakdown};
