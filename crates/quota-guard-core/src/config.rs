//! Configuration module
//!
//! Runtime settings for a polling run: regions, where the quota list lives,
//! which usage sink to write to and the knobs for nested enumeration.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

use crate::sink_backend::SinkBackend;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_CSV_PATH: &str = "quota_usage.csv";
const DEFAULT_MAX_NESTED_CALLS: usize = 1;
const DEFAULT_METRIC_WINDOW_MINUTES: u32 = 5;

/// Where the quota list document is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuotaListSource {
    File(PathBuf),
    S3 { bucket: String, key: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Region the process runs in; Global descriptors are checked here
    pub current_region: String,
    pub regions: Vec<String>,
    pub quota_list: Option<QuotaListSource>,
    pub sink: SinkBackend,
    pub ddb_table: Option<String>,
    pub csv_path: PathBuf,
    /// EventBridge bus; events are only logged when unset
    pub event_bus: Option<String>,
    pub max_nested_calls: usize,
    pub metric_window_minutes: u32,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    ///
    /// The result is not validated so callers can apply overrides first.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let current_region = var("AWS_REGION")
            .or_else(|| var("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let regions = match var("REGION_LIST") {
            Some(list) => parse_region_list(&list),
            None => vec![current_region.clone()],
        };

        let quota_list = match (
            var("QUOTA_LIST_PATH"),
            var("SERVICEQUOTA_BUCKET"),
            var("QUOTALIST_FILE"),
        ) {
            (Some(path), _, _) => Some(QuotaListSource::File(PathBuf::from(path))),
            (None, Some(bucket), Some(key)) => Some(QuotaListSource::S3 { bucket, key }),
            _ => None,
        };

        let sink = match var("USAGE_SINK") {
            Some(value) => value.parse()?,
            None => SinkBackend::DynamoDb,
        };

        let max_nested_calls = match var("MAX_NESTED_CALLS") {
            Some(value) => value
                .trim()
                .parse()
                .context("MAX_NESTED_CALLS must be a valid number")?,
            None => DEFAULT_MAX_NESTED_CALLS,
        };

        let metric_window_minutes = match var("METRIC_WINDOW_MINUTES") {
            Some(value) => value
                .trim()
                .parse()
                .context("METRIC_WINDOW_MINUTES must be a valid number")?,
            None => DEFAULT_METRIC_WINDOW_MINUTES,
        };

        Ok(Self {
            current_region,
            regions,
            quota_list,
            sink,
            ddb_table: var("DDB_TABLE"),
            csv_path: var("QUOTA_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH)),
            event_bus: var("EVENT_BUS"),
            max_nested_calls,
            metric_window_minutes,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.quota_list.is_none() {
            return Err(anyhow::anyhow!(
                "No quota list configured: set QUOTA_LIST_PATH or SERVICEQUOTA_BUCKET and QUOTALIST_FILE"
            ));
        }

        if self.regions.is_empty() {
            return Err(anyhow::anyhow!("REGION_LIST must name at least one region"));
        }

        if self.sink == SinkBackend::DynamoDb && self.ddb_table.is_none() {
            return Err(anyhow::anyhow!(
                "DDB_TABLE must be set when USAGE_SINK is dynamodb"
            ));
        }

        if self.max_nested_calls == 0 {
            return Err(anyhow::anyhow!("MAX_NESTED_CALLS must be at least 1"));
        }

        if self.metric_window_minutes == 0 {
            return Err(anyhow::anyhow!("METRIC_WINDOW_MINUTES must be at least 1"));
        }

        Ok(())
    }
}

/// Split a comma separated region list, dropping blanks.
pub fn parse_region_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|region| !region.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[("QUOTA_LIST_PATH", "quotas.json")]).unwrap();
        assert_eq!(config.current_region, "us-east-1");
        assert_eq!(config.regions, vec!["us-east-1".to_string()]);
        assert_eq!(config.sink, SinkBackend::DynamoDb);
        assert_eq!(config.csv_path, PathBuf::from("quota_usage.csv"));
        assert_eq!(config.max_nested_calls, 1);
        assert_eq!(config.metric_window_minutes, 5);
        assert!(config.event_bus.is_none());
    }

    #[test]
    fn region_list_is_trimmed() {
        let config = config_from(&[
            ("AWS_REGION", "eu-west-1"),
            ("REGION_LIST", " us-east-1, ,eu-west-1 ,"),
            ("QUOTA_LIST_PATH", "quotas.json"),
        ])
        .unwrap();
        assert_eq!(config.current_region, "eu-west-1");
        assert_eq!(config.regions, vec!["us-east-1", "eu-west-1"]);
    }

    #[test]
    fn s3_quota_list_needs_bucket_and_key() {
        let config = config_from(&[
            ("SERVICEQUOTA_BUCKET", "ops-config"),
            ("QUOTALIST_FILE", "quotas/list.json"),
        ])
        .unwrap();
        assert_eq!(
            config.quota_list,
            Some(QuotaListSource::S3 {
                bucket: "ops-config".to_string(),
                key: "quotas/list.json".to_string(),
            })
        );

        let config = config_from(&[("SERVICEQUOTA_BUCKET", "ops-config")]).unwrap();
        assert!(config.quota_list.is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn dynamodb_sink_requires_table() {
        let config = config_from(&[("QUOTA_LIST_PATH", "quotas.json")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("QUOTA_LIST_PATH", "quotas.json"),
            ("DDB_TABLE", "quota-usage"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn csv_sink_validates_without_table() {
        let config = config_from(&[
            ("QUOTA_LIST_PATH", "quotas.json"),
            ("USAGE_SINK", "csv"),
            ("QUOTA_CSV_PATH", "/tmp/usage.csv"),
        ])
        .unwrap();
        assert_eq!(config.sink, SinkBackend::Csv);
        assert_eq!(config.csv_path, PathBuf::from("/tmp/usage.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[("USAGE_SINK", "postgres")]).is_err());
        assert!(config_from(&[("MAX_NESTED_CALLS", "many")]).is_err());

        let config = config_from(&[
            ("QUOTA_LIST_PATH", "quotas.json"),
            ("USAGE_SINK", "memory"),
            ("MAX_NESTED_CALLS", "0"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
