use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An individual entity whose own usage ratio crosses the threshold.
///
/// Serialized with the field names the persisted `ResourceList` has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingResource {
    #[serde(rename = "resourceARN")]
    pub resource_id: String,
    #[serde(rename = "usageValue")]
    pub usage_value: Decimal,
}

impl CrossingResource {
    pub fn new(resource_id: impl Into<String>, usage_value: Decimal) -> Self {
        Self {
            resource_id: resource_id.into(),
            usage_value,
        }
    }
}

/// Outcome of one checker routine invocation for one region.
///
/// Handed once to the reporting sink and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaCheckResult {
    pub region: String,
    pub service_code: String,
    pub quota_code: String,
    pub limit_value: Decimal,
    pub usage_value: Decimal,
    pub crossing_resources: Vec<CrossingResource>,
    pub threshold_crossed: bool,
}

impl QuotaCheckResult {
    /// Crossing resources as the JSON array persisted in `ResourceList`.
    pub fn resource_list_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.crossing_resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_list_uses_wire_field_names() {
        let result = QuotaCheckResult {
            region: "us-east-1".to_string(),
            service_code: "vpc".to_string(),
            quota_code: "L-DFA99DE7".to_string(),
            limit_value: Decimal::from(2),
            usage_value: Decimal::from(2),
            crossing_resources: vec![CrossingResource::new("nat-0abc", Decimal::from(2))],
            threshold_crossed: true,
        };

        let json: serde_json::Value =
            serde_json::from_str(&result.resource_list_json().unwrap()).unwrap();
        assert_eq!(json[0]["resourceARN"], "nat-0abc");
        assert_eq!(json[0]["usageValue"].as_f64(), Some(2.0));
    }

    #[test]
    fn empty_resource_list_is_empty_array() {
        let result = QuotaCheckResult {
            region: "eu-west-1".to_string(),
            service_code: "s3".to_string(),
            quota_code: "L-DC2B2D3D".to_string(),
            limit_value: Decimal::from(100),
            usage_value: Decimal::from(3),
            crossing_resources: Vec::new(),
            threshold_crossed: false,
        };
        assert_eq!(result.resource_list_json().unwrap(), "[]");
    }
}
