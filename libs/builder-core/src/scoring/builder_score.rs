//! Builder Score Calculator
//!
//! Produces an unbounded, non-negative integer score. The score is a pure
//! function of the signals and a reference clock reading, so it can be
//! recomputed at any time.

use crate::entity::BuilderSignals;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const POINTS_PER_CONTRACT: u64 = 50;

/// Result of builder score calculation
#[derive(Debug, Clone)]
pub struct BuilderScoreResult {
    /// Total score, equal to the sum of the breakdown
    pub total: u64,
    pub breakdown: Vec<ScoreBreakdown>,
}

/// Individual score component breakdown
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub name: String,
    pub score: u64,
    pub reason: String,
}

/// Builder score calculator
pub struct BuilderScoreCalculator;

impl BuilderScoreCalculator {
    /// Calculate the score for a set of signals as of `now` (Unix seconds)
    pub fn calculate(signals: &BuilderSignals, now: i64) -> BuilderScoreResult {
        let mut breakdown = Vec::with_capacity(4);

        breakdown.push(ScoreBreakdown {
            name: "Transactions".to_string(),
            score: signals.transactions,
            reason: format!("{} transactions", signals.transactions),
        });

        breakdown.push(ScoreBreakdown {
            name: "Balance".to_string(),
            score: Self::balance_points(&signals.balance),
            reason: format!("Balance of {}", signals.balance),
        });

        let contract_count = signals.contracts.len() as u64;
        breakdown.push(ScoreBreakdown {
            name: "Contracts".to_string(),
            score: contract_count * POINTS_PER_CONTRACT,
            reason: format!("{} deployed contracts", contract_count),
        });

        let (recency_score, recency_reason) = Self::recency(signals.last_activity, now);
        breakdown.push(ScoreBreakdown {
            name: "Recency".to_string(),
            score: recency_score,
            reason: recency_reason.to_string(),
        });

        BuilderScoreResult {
            total: breakdown.iter().map(|b| b.score).sum(),
            breakdown,
        }
    }

    /// Total score only
    pub fn score(signals: &BuilderSignals, now: i64) -> u64 {
        Self::calculate(signals, now).total
    }

    /// One point per 0.1 native unit, truncated.
    ///
    /// Unparseable or negative balances contribute nothing; the collector is
    /// responsible for handing over well-formed non-negative values.
    pub fn balance_points(balance: &str) -> u64 {
        match balance.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => (value * 10.0).floor() as u64,
            _ => 0,
        }
    }

    /// Recency bonus for the given last activity
    pub fn recency_bonus(last_activity: Option<i64>, now: i64) -> u64 {
        Self::recency(last_activity, now).0
    }

    // Lower bounds are inclusive: exactly one day old is already in the 50 tier.
    // Activity stamped after `now` counts as under a day old.
    fn recency(last_activity: Option<i64>, now: i64) -> (u64, &'static str) {
        let Some(last_activity) = last_activity else {
            return (0, "No recent activity found");
        };

        let days_since = (now - last_activity) as f64 / SECONDS_PER_DAY;

        match days_since {
            d if d < 1.0 => (100, "Active within the last day"),
            d if d < 7.0 => (50, "Active within the last week"),
            d if d < 30.0 => (25, "Active within the last 30 days"),
            _ => (0, "Inactive for 30 days or more"),
        }
    }
}
