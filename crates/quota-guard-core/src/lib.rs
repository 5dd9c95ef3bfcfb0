//! quota-guard core library
//!
//! Domain model, checker identifiers, the threshold decision rule and configuration
//! shared by every quota-guard crate.

pub mod checker_id;
pub mod config;
pub mod error;
pub mod models;
pub mod sink_backend;
pub mod threshold;

// Re-export commonly used types
pub use checker_id::CheckerId;
pub use config::{Config, QuotaListSource};
pub use error::{DescriptorError, DescriptorResult};
pub use models::{
    parse_descriptors, AppliedAtLevel, CrossingResource, QuotaCheckResult, QuotaDescriptor,
    ThresholdEvent, ThresholdEventDetail, UsageKey, UsageRecord, EVENT_DETAIL_TYPE,
    EVENT_SOURCE,
};
pub use sink_backend::SinkBackend;
pub use threshold::{Comparison, ThresholdRule, ThresholdUnit};
