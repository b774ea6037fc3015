use std::{env, path::PathBuf, str::FromStr};

use collector::{CollectorConfig, RetryPolicy};

use crate::error::AppError;

pub mod defaults {
    pub const BUILDERS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e:demo-passkey";
    pub const REPORT_PATH: &str = "builder-report.json";
    pub const TOP_BUILDERS_LIMIT: &str = "10";
    pub const ACTIVITY_WINDOW: &str = "100";
    pub const MAX_RETRIES: &str = "3";
    pub const RPC_DELAY_MS: &str = "500";
    pub const LOG_FILTER: &str = "tracker=info,collector=info,builder_core=info";
}

/// An address to track and its pass-through passkey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderEntry {
    pub address: String,
    pub passkey: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub builders: Vec<BuilderEntry>,
    pub report_path: PathBuf,
    pub top_limit: usize,
    pub collector: CollectorConfig,
    pub redis_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = lookup("RPC_URL").ok_or_else(|| AppError::MissingEnvVar("RPC_URL".into()))?;

        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let builders = parse_builders(&var("BUILDERS", defaults::BUILDERS))?;
        let report_path = PathBuf::from(var("REPORT_PATH", defaults::REPORT_PATH));
        let top_limit = parse_var("TOP_BUILDERS_LIMIT", var("TOP_BUILDERS_LIMIT", defaults::TOP_BUILDERS_LIMIT))?;

        let collector = CollectorConfig {
            activity_window: parse_var("ACTIVITY_WINDOW", var("ACTIVITY_WINDOW", defaults::ACTIVITY_WINDOW))?,
            retry: RetryPolicy {
                max_retries: parse_var("MAX_RETRIES", var("MAX_RETRIES", defaults::MAX_RETRIES))?,
                base_delay_ms: parse_var("RPC_DELAY_MS", var("RPC_DELAY_MS", defaults::RPC_DELAY_MS))?,
            },
        };

        let redis_url = lookup("REDIS_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            rpc_url,
            builders,
            report_path,
            top_limit,
            collector,
            redis_url,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, value: String) -> Result<T, AppError> {
    value.trim().parse::<T>().map_err(|_| AppError::InvalidEnvVar {
        name: name.to_string(),
        value,
    })
}

/// Parse a comma-separated `address[:passkey]` list
pub fn parse_builders(value: &str) -> Result<Vec<BuilderEntry>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (address, passkey) = entry.split_once(':').unwrap_or((entry, ""));
            let address = address.trim();

            if address.is_empty() {
                return Err(AppError::InvalidBuilder(entry.to_string()));
            }

            Ok(BuilderEntry {
                address: address.to_string(),
                passkey: passkey.trim().to_string(),
            })
        })
        .collect()
}
