use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decimal_string;
use super::result::QuotaCheckResult;

/// Composite key of a persisted usage record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsageKey {
    pub quota_code: String,
    pub service_code: String,
    pub region: String,
}

impl UsageKey {
    pub fn new(
        quota_code: impl Into<String>,
        service_code: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            quota_code: quota_code.into(),
            service_code: service_code.into(),
            region: region.into(),
        }
    }
}

/// Latest usage snapshot for one key. Later writes overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsageRecord {
    #[serde(flatten)]
    pub key: UsageKey,
    /// Numeric string, e.g. `"50"`
    pub limit_value: String,
    /// Numeric string, e.g. `"7"`
    pub usage_value: String,
    /// JSON array of crossing resources, `"[]"` when none
    pub resource_list: String,
    /// Assigned by the store; the durable store leaves it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl UsageRecord {
    pub fn from_result(result: &QuotaCheckResult) -> serde_json::Result<Self> {
        Ok(Self {
            key: UsageKey::new(&result.quota_code, &result.service_code, &result.region),
            limit_value: decimal_string(result.limit_value),
            usage_value: decimal_string(result.usage_value),
            resource_list: result.resource_list_json()?,
            timestamp: None,
        })
    }
}
