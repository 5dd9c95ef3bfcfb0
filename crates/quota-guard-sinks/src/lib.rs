//! quota-guard reporting sinks
//!
//! A check result is reported exactly once: the usage record is upserted into a
//! [`UsageStore`], then a [`ThresholdEvent`](quota_guard_core::ThresholdEvent) is
//! published when the threshold was crossed. Publishing only happens after a
//! successful write.
//!
//! # Stores
//!
//! - DynamoDB table keyed by quota code, service code and region (feature `dynamodb`)
//! - Tabular CSV file rewritten on each upsert
//! - In-memory map
//!
//! # Publishers
//!
//! - EventBridge bus (feature `eventbridge`)
//! - Log-only, when no bus is configured
//! - In-memory recorder

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
#[cfg(feature = "eventbridge")]
pub mod eventbridge;
pub mod factory;
pub mod log_publisher;
pub mod memory;
pub mod sink;
pub mod tabular;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoUsageStore;
#[cfg(feature = "eventbridge")]
pub use eventbridge::EventBridgePublisher;
pub use factory::{create_publisher, create_sink, create_store};
pub use log_publisher::LogPublisher;
pub use memory::{MemoryPublisher, MemoryUsageStore};
pub use quota_guard_core::SinkBackend;
pub use sink::UsageSink;
pub use tabular::CsvUsageStore;
pub use traits::{
    Delivery, EventPublisher, Notification, ReportingSink, SinkError, SinkResult, UsageStore,
};
