use std::path::Path;

use builder_core::{BuilderEngine, Report, ReportOptions};
use collector::{collect_network_stats, collect_signals, SignalSource};

use crate::{config::BuilderEntry, error::AppError};

/// Fetch signals for each builder and score it into the engine.
///
/// Builders are tracked one at a time so no address ever has two
/// updates in flight.
pub async fn track_builders<S>(
    engine: &mut BuilderEngine,
    source: &S,
    builders: &[BuilderEntry],
) -> Result<(), AppError>
where
    S: SignalSource + ?Sized,
{
    for entry in builders {
        let signals = collect_signals(source, &entry.address).await;
        let record = engine.track(&entry.address, &entry.passkey, signals)?;

        tracing::info!(
            "Tracked builder {}: {} transactions, balance {}, score {}",
            record.address,
            record.transactions,
            record.balance,
            record.score()
        );
    }

    Ok(())
}

/// Generate a report over every tracked builder with a fresh network snapshot
pub async fn build_report<S>(engine: &BuilderEngine, source: &S, limit: usize) -> Report
where
    S: SignalSource + ?Sized,
{
    let network_stats = collect_network_stats(source).await;
    engine.report(network_stats, ReportOptions { limit })
}

pub async fn write_report(report: &Report, path: &Path) -> Result<(), AppError> {
    let json = report.to_json_pretty()?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| AppError::ReportWrite {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    tracing::info!(
        "Saved report for {} builders to {}",
        report.total_builders,
        path.display()
    );
    Ok(())
}
