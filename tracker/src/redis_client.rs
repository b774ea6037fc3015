use builder_core::Report;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use crate::error::AppError;

/// Redis publisher for streaming finished reports to live consumers
pub struct ReportPublisher {
    connection: MultiplexedConnection,
}

impl ReportPublisher {
    pub async fn new(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url).map_err(|e| AppError::RedisConnection(e.to_string()))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::RedisConnection(e.to_string()))?;

        tracing::info!("Connected to Redis at {}", redis_url);
        Ok(Self { connection })
    }

    /// Publish a report as JSON on the report channel
    pub async fn publish_report(&mut self, report: &Report) -> Result<(), AppError> {
        let payload = serde_json::to_string(report)?;

        self.connection
            .publish::<_, _, ()>(channels::REPORT, &payload)
            .await
            .map_err(|e| AppError::RedisPublish(e.to_string()))?;

        tracing::info!("Published to {}: {} bytes", channels::REPORT, payload.len());
        Ok(())
    }
}

/// Redis channels for builder reports
pub mod channels {
    /// Channel carrying every generated report
    pub const REPORT: &str = "builders:report";
}
