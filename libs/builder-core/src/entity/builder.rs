use serde::Serialize;

use crate::scoring::BuilderScoreCalculator;

/// Raw per-address facts as produced by a signal collector.
///
/// A collector that failed to fetch a signal hands over the same default it
/// would for a genuinely empty one; the engine cannot tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderSignals {
    pub transactions: u64,
    /// Balance in native units (not wei), e.g. `"1.25"`
    pub balance: String,
    pub contracts: Vec<String>,
    /// Unix timestamp (seconds) of the most recent activity found
    pub last_activity: Option<i64>,
}

impl Default for BuilderSignals {
    fn default() -> Self {
        Self {
            transactions: 0,
            balance: "0".to_string(),
            contracts: Vec::new(),
            last_activity: None,
        }
    }
}

/// A tracked builder address with its derived score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderRecord {
    pub address: String,
    pub passkey: String,
    pub transactions: u64,
    pub balance: String,
    pub contracts: Vec<String>,
    pub last_activity: Option<i64>,
    score: u64,
}

impl BuilderRecord {
    /// Build a record and score it against `now` (Unix seconds).
    /// The address is stored in its normalized form.
    pub fn new(address: &str, passkey: &str, signals: BuilderSignals, now: i64) -> Self {
        let score = BuilderScoreCalculator::score(&signals, now);

        Self {
            address: normalize_address(address),
            passkey: passkey.to_string(),
            transactions: signals.transactions,
            balance: signals.balance,
            contracts: signals.contracts,
            last_activity: signals.last_activity,
            score,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Signals this record was scored from
    pub fn signals(&self) -> BuilderSignals {
        BuilderSignals {
            transactions: self.transactions,
            balance: self.balance.clone(),
            contracts: self.contracts.clone(),
            last_activity: self.last_activity,
        }
    }

    /// Recompute the score from the current fields against a new clock reading
    pub fn rescore(&mut self, now: i64) {
        self.score = BuilderScoreCalculator::score(&self.signals(), now);
    }
}

/// Canonical registry key: trimmed and ASCII-lowercased.
/// Chain addresses are checksummed by case only, so case carries no identity.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}
