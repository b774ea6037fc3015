use serde::{Deserialize, Serialize};

/// Point-in-time network snapshot, included verbatim in reports.
///
/// Every field is optional so a failed fetch can degrade to the empty
/// structure, which serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_block: Option<u64>,
    /// Unix timestamp (seconds) of the latest block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
    /// Gas price in gwei
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<u64>,
}

impl NetworkStats {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
