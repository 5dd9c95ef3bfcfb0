use serde::{Deserialize, Serialize};

use super::decimal_string;
use super::result::{CrossingResource, QuotaCheckResult};

/// Source attached to every threshold event.
pub const EVENT_SOURCE: &str = "quota-guard";

/// Detail type attached to every threshold event.
pub const EVENT_DETAIL_TYPE: &str = "quota-threshold-event";

/// Notification published when a check crosses its threshold. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ThresholdEvent {
    pub source: String,
    pub detail_type: String,
    pub detail: ThresholdEventDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ThresholdEventDetail {
    pub quota_code: String,
    pub limit_value: String,
    pub region: String,
    pub resource_list: Vec<CrossingResource>,
    pub service_code: String,
    pub usage_value: String,
}

impl ThresholdEvent {
    pub fn from_result(result: &QuotaCheckResult) -> Self {
        Self {
            source: EVENT_SOURCE.to_string(),
            detail_type: EVENT_DETAIL_TYPE.to_string(),
            detail: ThresholdEventDetail {
                quota_code: result.quota_code.clone(),
                limit_value: decimal_string(result.limit_value),
                region: result.region.clone(),
                resource_list: result.crossing_resources.clone(),
                service_code: result.service_code.clone(),
                usage_value: decimal_string(result.usage_value),
            },
        }
    }

    /// The `Detail` payload as a JSON document.
    pub fn detail_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.detail)
    }
}
