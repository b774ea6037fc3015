use chrono::{DateTime, Utc};

use crate::{
    entity::{normalize_address, BuilderRecord, BuilderSignals, NetworkStats},
    error::EngineError,
    registry::Registry,
    report::{Report, ReportOptions},
    scoring::BuilderScoreCalculator,
};

/// Scores builders and owns the registry they are kept in.
///
/// One engine lives for one run. Callers only ever receive copies of stored
/// records, so nothing outside the engine can alter its registry.
#[derive(Debug, Default)]
pub struct BuilderEngine {
    registry: Registry,
}

impl BuilderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score and store a builder against the current wall clock
    pub fn track(
        &mut self,
        address: &str,
        passkey: &str,
        signals: BuilderSignals,
    ) -> Result<BuilderRecord, EngineError> {
        self.track_at(address, passkey, signals, Utc::now().timestamp())
    }

    /// Score and store a builder as of `now` (Unix seconds).
    ///
    /// Re-tracking an address replaces its record entirely.
    pub fn track_at(
        &mut self,
        address: &str,
        passkey: &str,
        signals: BuilderSignals,
        now: i64,
    ) -> Result<BuilderRecord, EngineError> {
        if normalize_address(address).is_empty() {
            return Err(EngineError::InvalidInput("address must not be empty".into()));
        }

        let record = BuilderRecord::new(address, passkey, signals, now);
        tracing::debug!(address = %record.address, score = record.score(), "Tracked builder");

        if tracing::enabled!(tracing::Level::DEBUG) {
            for component in BuilderScoreCalculator::calculate(&record.signals(), now).breakdown {
                tracing::debug!(
                    address = %record.address,
                    component = %component.name,
                    points = component.score,
                    "{}",
                    component.reason
                );
            }
        }

        if self.registry.upsert(record.clone()).is_some() {
            tracing::debug!(address = %record.address, "Replaced existing builder record");
        }

        Ok(record)
    }

    pub fn get(&self, address: &str) -> Option<BuilderRecord> {
        self.registry.get(address).cloned()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Generate a report stamped with the current time
    pub fn report(&self, network_stats: Option<NetworkStats>, options: ReportOptions) -> Report {
        self.report_at(network_stats, Utc::now(), options)
    }

    pub fn report_at(
        &self,
        network_stats: Option<NetworkStats>,
        generated_at: DateTime<Utc>,
        options: ReportOptions,
    ) -> Report {
        Report::generate(self.registry.all(), network_stats, generated_at, options)
    }
}
