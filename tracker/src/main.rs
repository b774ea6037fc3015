use std::error::Error;

use builder_core::BuilderEngine;
use config::Config;
use redis_client::ReportPublisher;
use service::{build_report, track_builders, write_report};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

mod config;
mod error;
mod redis_client;
mod service;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config::defaults::LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!("Builder tracking failed: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    tracing::info!("Starting builder tracker for {} addresses...", config.builders.len());

    let source = collector::connect(&config.rpc_url, config.collector).await?;
    tracing::info!("Connected to RPC at {}", config.rpc_url);

    let mut engine = BuilderEngine::new();
    track_builders(&mut engine, &source, &config.builders).await?;

    let report = build_report(&engine, &source, config.top_limit).await;
    write_report(&report, &config.report_path).await?;

    if let Some(redis_url) = &config.redis_url {
        // Continue on Redis errors - the file is the report of record
        match ReportPublisher::new(redis_url).await {
            Ok(mut publisher) => {
                if let Err(e) = publisher.publish_report(&report).await {
                    tracing::error!("Redis publish error: {}", e);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
    }

    Ok(())
}
