use builder_core::EngineError;
use collector::CollectorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing `{0}` environment variable")]
    MissingEnvVar(String),

    #[error("Invalid value for `{name}`: `{value}`")]
    InvalidEnvVar { name: String, value: String },

    #[error("Invalid builder entry: `{0}`")]
    InvalidBuilder(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Collector(#[from] CollectorError),

    #[error("Report serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write report to {path}: {reason}")]
    ReportWrite { path: String, reason: String },

    #[error("Redis connection error: {0}")]
    RedisConnection(String),

    #[error("Redis publish error: {0}")]
    RedisPublish(String),
}
