//! JSON-RPC backed signal source

use std::{future::Future, str::FromStr};

use alloy::{
    consensus::Transaction as _,
    eips::BlockNumberOrTag,
    primitives::{
        utils::{format_ether, format_units},
        Address, U256,
    },
    providers::{Provider, ProviderBuilder},
    rpc::types::BlockTransactionsKind,
};
use async_trait::async_trait;
use builder_core::NetworkStats;

use crate::{
    error::CollectorError,
    retry::{with_retry, RetryPolicy},
    source::SignalSource,
};

mod defaults {
    pub const ACTIVITY_WINDOW: u64 = 100;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Number of most recent blocks scanned for last activity
    pub activity_window: u64,
    pub retry: RetryPolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            activity_window: defaults::ACTIVITY_WINDOW,
            retry: RetryPolicy::default(),
        }
    }
}

/// Signal source reading from an EVM node
pub struct RpcCollector<P> {
    provider: P,
    config: CollectorConfig,
}

/// Connect to a node over http, ws or ipc, picked from the url
pub async fn connect(
    rpc_url: &str,
    config: CollectorConfig,
) -> Result<RpcCollector<impl Provider>, CollectorError> {
    let provider = ProviderBuilder::new()
        .on_builtin(rpc_url)
        .await
        .map_err(|e| CollectorError::RpcError(e.to_string()))?;

    Ok(RpcCollector::new(provider, config))
}

impl<P: Provider> RpcCollector<P> {
    pub fn new(provider: P, config: CollectorConfig) -> Self {
        Self { provider, config }
    }

    async fn latest_block_number(&self) -> Result<u64, CollectorError> {
        let provider = &self.provider;
        with_retry("get_block_number", self.config.retry, || async move {
            provider.get_block_number().await
        })
        .await
    }
}

#[async_trait]
impl<P: Provider> SignalSource for RpcCollector<P> {
    async fn transaction_count(&self, address: &str) -> Result<u64, CollectorError> {
        let address = parse_address(address)?;
        let provider = &self.provider;

        with_retry("get_transaction_count", self.config.retry, || async move {
            provider.get_transaction_count(address).await
        })
        .await
    }

    async fn balance(&self, address: &str) -> Result<String, CollectorError> {
        let address = parse_address(address)?;
        let provider = &self.provider;

        let wei = with_retry("get_balance", self.config.retry, || async move {
            provider.get_balance(address).await
        })
        .await?;

        Ok(trim_decimal(&format_ether(wei)))
    }

    /// Contract deployment detection is not implemented; always empty.
    async fn deployed_contracts(&self, _address: &str) -> Result<Vec<String>, CollectorError> {
        Ok(Vec::new())
    }

    /// Best-effort: only the most recent `activity_window` blocks are scanned,
    /// newest first. Older activity is reported as none.
    async fn last_activity(&self, address: &str) -> Result<Option<i64>, CollectorError> {
        let address = parse_address(address)?;
        let provider = &self.provider;
        let retry = self.config.retry;
        let latest = self.latest_block_number().await?;

        find_last_activity(address, scan_window(latest, self.config.activity_window), |number| async move {
            let block = with_retry("get_block_by_number", retry, || async move {
                provider
                    .get_block_by_number(BlockNumberOrTag::Number(number), BlockTransactionsKind::Full)
                    .await
            })
            .await?;

            Ok::<_, CollectorError>(block.map(|block| BlockActivity {
                timestamp: block.header.timestamp as i64,
                transfers: block.transactions.txns().map(|tx| (tx.from, tx.to())).collect(),
            }))
        })
        .await
    }

    async fn network_stats(&self) -> Result<NetworkStats, CollectorError> {
        let provider = &self.provider;
        let latest_block = self.latest_block_number().await?;

        let block = with_retry("get_block_by_number", self.config.retry, || async move {
            provider
                .get_block_by_number(BlockNumberOrTag::Number(latest_block), BlockTransactionsKind::Hashes)
                .await
        })
        .await?
        .ok_or(CollectorError::BlockNotFound(latest_block))?;

        let gas_price = with_retry("get_gas_price", self.config.retry, || async move {
            provider.get_gas_price().await
        })
        .await?;

        let chain_id = with_retry("get_chain_id", self.config.retry, || async move {
            provider.get_chain_id().await
        })
        .await?;

        let gas_price_gwei = format_units(U256::from(gas_price), "gwei")
            .map_err(|e| CollectorError::Units(e.to_string()))?;

        Ok(NetworkStats {
            latest_block: Some(latest_block),
            block_time: Some(block.header.timestamp as i64),
            gas_price: Some(trim_decimal(&gas_price_gwei)),
            network_id: Some(chain_id),
        })
    }
}

/// Sender and recipient of every transaction in one block
#[derive(Debug, Clone)]
struct BlockActivity {
    timestamp: i64,
    transfers: Vec<(Address, Option<Address>)>,
}

/// Walk `blocks` in order and return the timestamp of the first one that
/// touches `address`. Blocks the node cannot return are skipped.
async fn find_last_activity<I, F, Fut>(
    address: Address,
    blocks: I,
    mut fetch: F,
) -> Result<Option<i64>, CollectorError>
where
    I: Iterator<Item = u64>,
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Option<BlockActivity>, CollectorError>>,
{
    for number in blocks {
        let Some(block) = fetch(number).await? else {
            tracing::debug!("Block {number} not available, skipping");
            continue;
        };

        if block.transfers.iter().any(|&(from, to)| touches(address, from, to)) {
            return Ok(Some(block.timestamp));
        }
    }

    Ok(None)
}

fn parse_address(address: &str) -> Result<Address, CollectorError> {
    Address::from_str(address.trim()).map_err(|_| CollectorError::InvalidAddress(address.into()))
}

/// Block numbers to scan, newest first, never below genesis
fn scan_window(latest: u64, window: u64) -> impl Iterator<Item = u64> {
    let count = window.min(latest.saturating_add(1));
    (0..count).map(move |offset| latest - offset)
}

/// Whether a transaction was sent by or to `address`.
/// Contract creations have no recipient.
fn touches(address: Address, from: Address, to: Option<Address>) -> bool {
    from == address || to == Some(address)
}

/// Drop trailing fractional zeros, keeping at least one decimal digit
fn trim_decimal(value: &str) -> String {
    match value.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const BUILDER: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    #[test]
    fn test_scan_window() {
        let blocks: Vec<u64> = scan_window(1_000, 3).collect();
        assert_eq!(blocks, vec![1_000, 999, 998]);

        assert_eq!(scan_window(1_000, 100).count(), 100);
        assert_eq!(scan_window(1_000, 100).last(), Some(901));
    }

    #[test]
    fn test_scan_window_near_genesis() {
        let blocks: Vec<u64> = scan_window(2, 100).collect();
        assert_eq!(blocks, vec![2, 1, 0]);
        assert_eq!(scan_window(2, 0).count(), 0);
    }

    fn block(timestamp: i64, transfers: Vec<(Address, Option<Address>)>) -> BlockActivity {
        BlockActivity { timestamp, transfers }
    }

    async fn scan(
        blocks: &HashMap<u64, BlockActivity>,
        latest: u64,
        window: u64,
    ) -> (Result<Option<i64>, CollectorError>, Vec<u64>) {
        let builder = parse_address(BUILDER).unwrap();
        let mut fetched = Vec::new();
        let result = find_last_activity(builder, scan_window(latest, window), |number| {
            fetched.push(number);
            std::future::ready(Ok(blocks.get(&number).cloned()))
        })
        .await;
        (result, fetched)
    }

    #[tokio::test]
    async fn test_last_activity_stops_at_newest_match() {
        let builder = parse_address(BUILDER).unwrap();
        let other = Address::repeat_byte(0x11);
        let blocks = HashMap::from([
            (10, block(1_000, vec![(other, Some(other))])),
            (9, block(900, vec![(other, Some(builder))])),
            (8, block(800, vec![(builder, None)])),
        ]);

        let (result, fetched) = scan(&blocks, 10, 100).await;

        assert_eq!(result.unwrap(), Some(900));
        assert_eq!(fetched, vec![10, 9]);
    }

    #[tokio::test]
    async fn test_last_activity_skips_missing_blocks() {
        let builder = parse_address(BUILDER).unwrap();
        let blocks = HashMap::from([(8, block(800, vec![(builder, None)]))]);

        let (result, fetched) = scan(&blocks, 10, 100).await;

        assert_eq!(result.unwrap(), Some(800));
        assert_eq!(fetched, vec![10, 9, 8]);
    }

    #[tokio::test]
    async fn test_last_activity_outside_window_is_none() {
        let builder = parse_address(BUILDER).unwrap();
        let other = Address::repeat_byte(0x11);
        let blocks = HashMap::from([
            (10, block(1_000, vec![(other, Some(other))])),
            (9, block(900, vec![])),
            (7, block(700, vec![(builder, Some(other))])),
        ]);

        let (result, fetched) = scan(&blocks, 10, 3).await;

        assert_eq!(result.unwrap(), None);
        assert_eq!(fetched, vec![10, 9, 8]);
    }

    #[tokio::test]
    async fn test_last_activity_fetch_error_propagates() {
        let builder = parse_address(BUILDER).unwrap();
        let result = find_last_activity(builder, scan_window(10, 100), |number| {
            std::future::ready(Err(CollectorError::BlockNotFound(number)))
        })
        .await;

        assert!(matches!(result, Err(CollectorError::BlockNotFound(10))));
    }

    #[test]
    fn test_touches() {
        let builder = parse_address(BUILDER).unwrap();
        let other = Address::repeat_byte(0x11);

        assert!(touches(builder, builder, Some(other)));
        assert!(touches(builder, other, Some(builder)));
        assert!(touches(builder, builder, None));
        assert!(!touches(builder, other, None));
        assert!(!touches(builder, other, Some(other)));
    }

    #[test]
    fn test_parse_address_any_case() {
        let checksummed = parse_address(BUILDER).unwrap();
        let lower = parse_address(&BUILDER.to_lowercase()).unwrap();
        assert_eq!(checksummed, lower);

        assert!(matches!(
            parse_address("not-an-address"),
            Err(CollectorError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_trim_decimal() {
        assert_eq!(trim_decimal("1.250000000000000000"), "1.25");
        assert_eq!(trim_decimal("0.000000000000000000"), "0.0");
        assert_eq!(trim_decimal("12.000000001"), "12.000000001");
        assert_eq!(trim_decimal("7"), "7");
    }

    #[test]
    fn test_formatted_balance() {
        let wei = U256::from(1_250_000_000_000_000_000_u128);
        assert_eq!(trim_decimal(&format_ether(wei)), "1.25");
    }

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.activity_window, 100);
        assert_eq!(config.retry, RetryPolicy::default());
    }
}
