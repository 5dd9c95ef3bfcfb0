//! In-process store and publisher

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use quota_guard_core::{ThresholdEvent, UsageKey, UsageRecord};
use tokio::sync::RwLock;

use crate::traits::{EventPublisher, SinkResult, UsageStore};

/// Usage store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    records: RwLock<HashMap<UsageKey, UsageRecord>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record.
    pub async fn records(&self) -> Vec<UsageRecord> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn upsert(&self, mut record: UsageRecord) -> SinkResult<()> {
        record.timestamp = Some(Utc::now());
        self.records
            .write()
            .await
            .insert(record.key.clone(), record);
        Ok(())
    }

    async fn get(&self, key: &UsageKey) -> SinkResult<Option<UsageRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Publisher that keeps every event it receives.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    events: RwLock<Vec<ThresholdEvent>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<ThresholdEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, event: &ThresholdEvent) -> SinkResult<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(usage: &str) -> UsageRecord {
        UsageRecord {
            key: UsageKey::new("L-1234", "vpc", "us-east-1"),
            limit_value: "100".to_string(),
            usage_value: usage.to_string(),
            resource_list: "[]".to_string(),
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_same_key() {
        let store = MemoryUsageStore::new();
        store.upsert(record("10")).await.unwrap();
        store.upsert(record("12")).await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store
            .get(&UsageKey::new("L-1234", "vpc", "us-east-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.usage_value, "12");
        assert!(stored.timestamp.is_some());
    }

    #[tokio::test]
    async fn missing_key_reads_none() {
        let store = MemoryUsageStore::new();
        assert!(store
            .get(&UsageKey::new("L-1234", "vpc", "eu-west-1"))
            .await
            .unwrap()
            .is_none());
    }
}
