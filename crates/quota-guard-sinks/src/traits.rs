//! Sink abstraction traits

use std::fmt::Debug;

use async_trait::async_trait;
use quota_guard_core::{QuotaCheckResult, ThresholdEvent, UsageKey, UsageRecord};
use serde::Serialize;
use thiserror::Error;

/// Sink operation errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Keyed store holding the latest usage record per (quota, service, region).
#[async_trait]
pub trait UsageStore: Send + Sync + Debug {
    /// Insert or overwrite the record under its key.
    async fn upsert(&self, record: UsageRecord) -> SinkResult<()>;

    async fn get(&self, key: &UsageKey) -> SinkResult<Option<UsageRecord>>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Destination for threshold events.
#[async_trait]
pub trait EventPublisher: Send + Sync + Debug {
    async fn publish(&self, event: &ThresholdEvent) -> SinkResult<()>;

    fn name(&self) -> &str;
}

/// What happened to the threshold event of one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Notification {
    /// Threshold not crossed
    NotRequired,
    Published,
    Failed { error: String },
    /// Threshold crossed but the record was not persisted
    Skipped,
}

/// Outcome of reporting one check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub persisted: bool,
    pub notification: Notification,
}

/// Receives each check result once. Failures are logged and reflected in the
/// returned [`Delivery`]; they never abort the caller.
#[async_trait]
pub trait ReportingSink: Send + Sync + Debug {
    async fn report(&self, result: &QuotaCheckResult) -> Delivery;
}
