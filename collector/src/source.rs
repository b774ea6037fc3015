use async_trait::async_trait;
use builder_core::{BuilderSignals, NetworkStats};

use crate::error::CollectorError;

/// Capabilities a chain-data backend provides for builder scoring
#[async_trait]
pub trait SignalSource: Send + Sync {
    async fn transaction_count(&self, address: &str) -> Result<u64, CollectorError>;

    /// Balance in native units as a decimal string
    async fn balance(&self, address: &str) -> Result<String, CollectorError>;

    async fn deployed_contracts(&self, address: &str) -> Result<Vec<String>, CollectorError>;

    /// Timestamp of the most recent activity in the source's scan window.
    /// `Ok(None)` means nothing was found, not that the address never acted.
    async fn last_activity(&self, address: &str) -> Result<Option<i64>, CollectorError>;

    async fn network_stats(&self) -> Result<NetworkStats, CollectorError>;
}

/// Fetch every signal for an address.
///
/// Failed fetches are logged and collapse to the same defaults as genuinely
/// empty signals: 0 transactions, a "0" balance, no contracts, no activity.
pub async fn collect_signals<S>(source: &S, address: &str) -> BuilderSignals
where
    S: SignalSource + ?Sized,
{
    let (transactions, balance, contracts, last_activity) = tokio::join!(
        source.transaction_count(address),
        source.balance(address),
        source.deployed_contracts(address),
        source.last_activity(address),
    );

    BuilderSignals {
        transactions: transactions
            .inspect_err(|error| tracing::warn!("Error fetching transaction count for {address}: {error}"))
            .unwrap_or(0),
        balance: balance
            .inspect_err(|error| tracing::warn!("Error fetching balance for {address}: {error}"))
            .unwrap_or_else(|_| "0".to_string()),
        contracts: contracts
            .inspect_err(|error| tracing::warn!("Error fetching contracts for {address}: {error}"))
            .unwrap_or_default(),
        last_activity: last_activity
            .inspect_err(|error| tracing::warn!("Error fetching last activity for {address}: {error}"))
            .unwrap_or(None),
    }
}

/// Fetch the network snapshot, `None` if the source failed
pub async fn collect_network_stats<S>(source: &S) -> Option<NetworkStats>
where
    S: SignalSource + ?Sized,
{
    source
        .network_stats()
        .await
        .inspect_err(|error| tracing::warn!("Error fetching network stats: {error}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        fail: bool,
    }

    impl FakeSource {
        fn check(&self) -> Result<(), CollectorError> {
            if self.fail {
                Err(CollectorError::RpcError("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SignalSource for FakeSource {
        async fn transaction_count(&self, _address: &str) -> Result<u64, CollectorError> {
            self.check().map(|_| 42)
        }

        async fn balance(&self, _address: &str) -> Result<String, CollectorError> {
            self.check().map(|_| "1.25".to_string())
        }

        async fn deployed_contracts(&self, _address: &str) -> Result<Vec<String>, CollectorError> {
            self.check().map(|_| vec!["0xc0ffee".to_string()])
        }

        async fn last_activity(&self, _address: &str) -> Result<Option<i64>, CollectorError> {
            self.check().map(|_| Some(1_700_000_000))
        }

        async fn network_stats(&self) -> Result<NetworkStats, CollectorError> {
            self.check().map(|_| NetworkStats {
                latest_block: Some(100),
                network_id: Some(1),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_collect_signals() {
        let signals = collect_signals(&FakeSource { fail: false }, "0xabc").await;

        assert_eq!(signals.transactions, 42);
        assert_eq!(signals.balance, "1.25");
        assert_eq!(signals.contracts, vec!["0xc0ffee".to_string()]);
        assert_eq!(signals.last_activity, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn test_failures_collapse_to_defaults() {
        let signals = collect_signals(&FakeSource { fail: true }, "0xabc").await;
        assert_eq!(signals, BuilderSignals::default());
    }

    #[tokio::test]
    async fn test_network_stats() {
        let stats = collect_network_stats(&FakeSource { fail: false }).await;
        assert_eq!(stats.and_then(|s| s.latest_block), Some(100));

        assert!(collect_network_stats(&FakeSource { fail: true }).await.is_none());
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let source: Box<dyn SignalSource> = Box::new(FakeSource { fail: false });
        let signals = collect_signals(source.as_ref(), "0xabc").await;
        assert_eq!(signals.transactions, 42);
    }
}
