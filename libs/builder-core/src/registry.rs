use std::collections::HashMap;

use crate::entity::{normalize_address, BuilderRecord};

/// Scored builders keyed by normalized address.
///
/// Records are kept in first-insertion order; re-tracking an address replaces
/// its record in place. Ranking never relies on this order beyond using it to
/// break score ties.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<BuilderRecord>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its address, returning the previous one.
    /// Only the engine stores records, so every stored score matches its fields.
    pub(crate) fn upsert(&mut self, mut record: BuilderRecord) -> Option<BuilderRecord> {
        record.address = normalize_address(&record.address);

        match self.index.get(&record.address) {
            Some(&position) => Some(std::mem::replace(&mut self.records[position], record)),
            None => {
                self.index.insert(record.address.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Find a record by address (any casing)
    pub fn get(&self, address: &str) -> Option<&BuilderRecord> {
        self.index
            .get(&normalize_address(address))
            .map(|&position| &self.records[position])
    }

    /// Snapshot of every record
    pub fn all(&self) -> Vec<BuilderRecord> {
        self.records.clone()
    }

    /// Number of tracked builders
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BuilderSignals;

    fn record(address: &str, transactions: u64) -> BuilderRecord {
        let signals = BuilderSignals {
            transactions,
            ..Default::default()
        };
        BuilderRecord::new(address, "", signals, 0)
    }

    #[test]
    fn test_upsert_and_get() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        assert!(registry.upsert(record("0xAAA", 1)).is_none());
        assert!(registry.upsert(record("0xbbb", 2)).is_none());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("0xaaa").map(|r| r.transactions), Some(1));
        assert_eq!(registry.get("0XBBB").map(|r| r.transactions), Some(2));
        assert!(registry.get("0xccc").is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut registry = Registry::new();
        registry.upsert(record("0xaaa", 1));
        registry.upsert(record("0xbbb", 2));

        let previous = registry.upsert(record("0xAaA", 10));

        assert_eq!(previous.map(|r| r.transactions), Some(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("0xaaa").map(|r| r.transactions), Some(10));

        let addresses: Vec<String> = registry.all().into_iter().map(|r| r.address).collect();
        assert_eq!(addresses, vec!["0xaaa", "0xbbb"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut registry = Registry::new();
        registry.upsert(record("0xaaa", 1));

        let mut snapshot = registry.all();
        snapshot[0].transactions = 999;

        assert_eq!(registry.get("0xaaa").map(|r| r.transactions), Some(1));
    }
}
