//! DynamoDB usage store
//!
//! Items are keyed by `QuotaCode` (partition) and `ServiceRegion` (sort, the
//! service code and region joined by `#`), so the full usage key
//! QuotaCode + ServiceCode + Region identifies one item. `put_item` overwrites
//! the previous item for the same key.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use quota_guard_core::{UsageKey, UsageRecord};

use crate::traits::{SinkError, SinkResult, UsageStore};

/// DynamoDB table store
#[derive(Debug, Clone)]
pub struct DynamoUsageStore {
    client: Client,
    table: String,
}

impl DynamoUsageStore {
    /// Create a store for `table` in `region`.
    pub async fn new(table: impl Into<String>, region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::from_conf(&config, table)
    }

    pub fn from_conf(config: &SdkConfig, table: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

const PARTITION_KEY: &str = "QuotaCode";
const SORT_KEY: &str = "ServiceRegion";

/// Table key attributes for a usage key.
fn key_attributes(key: &UsageKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            PARTITION_KEY.to_string(),
            AttributeValue::S(key.quota_code.clone()),
        ),
        (
            SORT_KEY.to_string(),
            AttributeValue::S(format!("{}#{}", key.service_code, key.region)),
        ),
    ])
}

fn item(record: &UsageRecord) -> HashMap<String, AttributeValue> {
    let mut item = key_attributes(&record.key);
    item.extend([
        (
            "ServiceCode".to_string(),
            AttributeValue::S(record.key.service_code.clone()),
        ),
        (
            "Region".to_string(),
            AttributeValue::S(record.key.region.clone()),
        ),
        (
            "LimitValue".to_string(),
            AttributeValue::N(record.limit_value.clone()),
        ),
        (
            "UsageValue".to_string(),
            AttributeValue::N(record.usage_value.clone()),
        ),
        (
            "ResourceList".to_string(),
            AttributeValue::S(record.resource_list.clone()),
        ),
    ]);
    item
}

fn attribute<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &'static str,
) -> SinkResult<&'a AttributeValue> {
    item.get(name)
        .ok_or_else(|| SinkError::MalformedRecord(format!("missing attribute {name}")))
}

fn string_attribute(item: &HashMap<String, AttributeValue>, name: &'static str) -> SinkResult<String> {
    attribute(item, name)?
        .as_s()
        .cloned()
        .map_err(|_| SinkError::MalformedRecord(format!("attribute {name} is not a string")))
}

fn number_attribute(item: &HashMap<String, AttributeValue>, name: &'static str) -> SinkResult<String> {
    attribute(item, name)?
        .as_n()
        .cloned()
        .map_err(|_| SinkError::MalformedRecord(format!("attribute {name} is not a number")))
}

fn record_from_item(item: &HashMap<String, AttributeValue>) -> SinkResult<UsageRecord> {
    Ok(UsageRecord {
        key: UsageKey::new(
            string_attribute(item, "QuotaCode")?,
            string_attribute(item, "ServiceCode")?,
            string_attribute(item, "Region")?,
        ),
        limit_value: number_attribute(item, "LimitValue")?,
        usage_value: number_attribute(item, "UsageValue")?,
        resource_list: string_attribute(item, "ResourceList")?,
        timestamp: None,
    })
}

#[async_trait]
impl UsageStore for DynamoUsageStore {
    async fn upsert(&self, record: UsageRecord) -> SinkResult<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item(&record)))
            .send()
            .await
            .map_err(|e| {
                SinkError::WriteFailed(format!(
                    "put_item into {}: {}",
                    self.table,
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }

    async fn get(&self, key: &UsageKey) -> SinkResult<Option<UsageRecord>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(key_attributes(key)))
            .send()
            .await
            .map_err(|e| {
                SinkError::ReadFailed(format!(
                    "get_item from {}: {}",
                    self.table,
                    DisplayErrorContext(e)
                ))
            })?;

        let record = output.item().map(record_from_item).transpose()?;
        Ok(record.filter(|record| record.key == *key))
    }

    fn name(&self) -> &str {
        "dynamodb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_carries_numbers_as_numeric_attributes() {
        let record = UsageRecord {
            key: UsageKey::new("L-DC2B2D3D", "s3", "us-east-1"),
            limit_value: "100".to_string(),
            usage_value: "87".to_string(),
            resource_list: "[]".to_string(),
            timestamp: None,
        };

        let item = item(&record);
        assert_eq!(item["LimitValue"], AttributeValue::N("100".to_string()));
        assert_eq!(item["UsageValue"], AttributeValue::N("87".to_string()));
        assert_eq!(item["Region"], AttributeValue::S("us-east-1".to_string()));

        let parsed = record_from_item(&item).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn key_covers_quota_service_and_region() {
        let ec2 = key_attributes(&UsageKey::new("L-1216C47A", "ec2", "us-east-1"));
        let vpc = key_attributes(&UsageKey::new("L-1216C47A", "vpc", "us-east-1"));

        assert_eq!(ec2.len(), 2);
        assert_eq!(ec2["QuotaCode"], AttributeValue::S("L-1216C47A".to_string()));
        assert_eq!(
            ec2["ServiceRegion"],
            AttributeValue::S("ec2#us-east-1".to_string())
        );
        assert_ne!(ec2, vpc);
    }

    #[test]
    fn item_includes_key_attributes() {
        let record = UsageRecord {
            key: UsageKey::new("L-1216C47A", "ec2", "eu-west-1"),
            limit_value: "5".to_string(),
            usage_value: "1".to_string(),
            resource_list: "[]".to_string(),
            timestamp: None,
        };

        let item = item(&record);
        for (name, value) in key_attributes(&record.key) {
            assert_eq!(item[&name], value);
        }
        assert_eq!(item["ServiceCode"], AttributeValue::S("ec2".to_string()));
    }

    #[test]
    fn malformed_item_is_rejected() {
        let mut item = item(&UsageRecord {
            key: UsageKey::new("L-DC2B2D3D", "s3", "us-east-1"),
            limit_value: "100".to_string(),
            usage_value: "87".to_string(),
            resource_list: "[]".to_string(),
            timestamp: None,
        });
        item.insert("UsageValue".to_string(), AttributeValue::S("87".to_string()));

        assert!(matches!(
            record_from_item(&item),
            Err(SinkError::MalformedRecord(_))
        ));
    }
}
