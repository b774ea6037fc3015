use std::{future::Future, time::Duration};

use alloy::transports::{TransportError, TransportResult};
use tokio::time::sleep;

use crate::error::CollectorError;

mod defaults {
    pub const MAX_RETRIES: u32 = 3;
    pub const BASE_DELAY_MS: u64 = 500;
}

/// Backoff policy for rate-limited RPC calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::MAX_RETRIES,
            base_delay_ms: defaults::BASE_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given (zero-based) attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(2_u64.saturating_pow(attempt)))
    }
}

/// Check if an error is a rate limit error
pub(crate) fn is_rate_limited(err: &TransportError) -> bool {
    is_rate_limit_message(&err.to_string())
}

fn is_rate_limit_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("429")
        || message.contains("rate limit")
        || message.contains("too many requests")
        || message.contains("-32005")
        || message.contains("limit exceeded")
}

/// Run an RPC call, backing off exponentially while the node rate-limits us.
/// One initial attempt plus up to `max_retries` retries; any other error is
/// returned immediately.
pub(crate) async fn with_retry<T, F, Fut>(
    label: &str,
    policy: RetryPolicy,
    mut call: F,
) -> Result<T, CollectorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TransportResult<T>>,
{
    let attempts = policy.max_retries.saturating_add(1);

    for attempt in 0..attempts {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if is_rate_limited(&err) => {
                if attempt + 1 == attempts {
                    tracing::warn!("{label}: rate limited (attempt {}/{}), giving up", attempt + 1, attempts);
                    break;
                }

                let backoff = policy.backoff(attempt);
                tracing::warn!(
                    "{label}: rate limited (attempt {}/{}), backing off for {}ms",
                    attempt + 1,
                    attempts,
                    backoff.as_millis()
                );
                sleep(backoff).await;
            }
            Err(err) => return Err(CollectorError::RpcError(format!("{label}: {err}"))),
        }
    }

    Err(CollectorError::MaxRetriesExceeded(policy.max_retries))
}
