//! Domain models

pub mod descriptor;
pub mod event;
pub mod record;
pub mod result;

pub use descriptor::{parse_descriptors, AppliedAtLevel, QuotaDescriptor};
pub use event::{ThresholdEvent, ThresholdEventDetail, EVENT_DETAIL_TYPE, EVENT_SOURCE};
pub use record::{UsageKey, UsageRecord};
pub use result::{CrossingResource, QuotaCheckResult};

use rust_decimal::Decimal;

/// Render a decimal the way persisted records carry numbers: plain, without
/// trailing zeros (`7.0` becomes `7`).
pub fn decimal_string(value: Decimal) -> String {
    value.normalize().to_string()
}
