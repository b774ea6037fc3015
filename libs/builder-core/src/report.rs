//! Report generation
//!
//! A report is a read-only summary derived from a snapshot of scored
//! builders plus a network snapshot. It is never stored by the engine.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::entity::{BuilderRecord, NetworkStats};

pub const DEFAULT_TOP_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Maximum number of entries in `topBuilders`
    pub limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TOP_LIMIT,
        }
    }
}

/// Builder report, written verbatim by downstream persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Generation instant, RFC 3339 in UTC
    pub timestamp: String,
    pub total_builders: usize,
    pub builders: Vec<BuilderRecord>,
    pub top_builders: Vec<BuilderRecord>,
    pub average_score: f64,
    pub network_stats: NetworkStats,
}

impl Report {
    /// Build a report from a snapshot of records.
    ///
    /// `topBuilders` is ordered by descending score; equal scores keep their
    /// snapshot order. A missing network snapshot is replaced by the empty one.
    pub fn generate(
        builders: Vec<BuilderRecord>,
        network_stats: Option<NetworkStats>,
        generated_at: DateTime<Utc>,
        options: ReportOptions,
    ) -> Self {
        let mut top_builders = builders.clone();
        // sort_by is stable
        top_builders.sort_by(|a, b| b.score().cmp(&a.score()));
        top_builders.truncate(options.limit);

        Self {
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_builders: builders.len(),
            average_score: average_score(&builders),
            top_builders,
            builders,
            network_stats: network_stats.unwrap_or_default(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Arithmetic mean of all scores, 0 when there are none
fn average_score(builders: &[BuilderRecord]) -> f64 {
    if builders.is_empty() {
        return 0.0;
    }

    let total: u64 = builders.iter().map(BuilderRecord::score).sum();
    total as f64 / builders.len() as f64
}
