//! Tabular file store
//!
//! Keeps one row per key in a CSV file with the columns
//! `QuotaCode, ServiceCode, Region, LimitValue, UsageValue, ResourceList, Timestamp`.
//! Each upsert rewrites the whole file through a temporary sibling.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use quota_guard_core::{UsageKey, UsageRecord};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use crate::traits::{SinkError, SinkResult, UsageStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Row {
    quota_code: String,
    service_code: String,
    region: String,
    limit_value: String,
    usage_value: String,
    resource_list: String,
    timestamp: String,
}

impl Row {
    fn from_record(record: &UsageRecord, timestamp: DateTime<Utc>) -> Self {
        Self {
            quota_code: record.key.quota_code.clone(),
            service_code: record.key.service_code.clone(),
            region: record.key.region.clone(),
            limit_value: record.limit_value.clone(),
            usage_value: record.usage_value.clone(),
            resource_list: record.resource_list.clone(),
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    fn matches(&self, key: &UsageKey) -> bool {
        self.quota_code == key.quota_code
            && self.service_code == key.service_code
            && self.region == key.region
    }

    fn into_record(self) -> UsageRecord {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|timestamp| timestamp.with_timezone(&Utc));
        UsageRecord {
            key: UsageKey::new(self.quota_code, self.service_code, self.region),
            limit_value: self.limit_value,
            usage_value: self.usage_value,
            resource_list: self.resource_list,
            timestamp,
        }
    }
}

/// CSV file store
#[derive(Debug)]
pub struct CsvUsageStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl CsvUsageStore {
    /// Create a store backed by `path`, creating parent directories.
    pub async fn new(path: impl Into<PathBuf>) -> SinkResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                SinkError::ConfigError(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_rows(&self) -> SinkResult<Vec<Row>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SinkError::ReadFailed(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows = reader.deserialize().collect::<Result<Vec<Row>, _>>()?;
        Ok(rows)
    }

    async fn write_rows(&self, rows: &[Row]) -> SinkResult<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| SinkError::WriteFailed(e.to_string()))?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, bytes).await.map_err(|e| {
            SinkError::WriteFailed(format!("{}: {}", staging.display(), e))
        })?;
        fs::rename(&staging, &self.path).await.map_err(|e| {
            SinkError::WriteFailed(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl UsageStore for CsvUsageStore {
    async fn upsert(&self, record: UsageRecord) -> SinkResult<()> {
        let _guard = self.lock.lock().await;

        let mut rows = self.read_rows().await?;
        let row = Row::from_record(&record, Utc::now());

        match rows.iter_mut().find(|existing| existing.matches(&record.key)) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }

        self.write_rows(&rows).await
    }

    async fn get(&self, key: &UsageKey) -> SinkResult<Option<UsageRecord>> {
        let _guard = self.lock.lock().await;

        Ok(self
            .read_rows()
            .await?
            .into_iter()
            .find(|row| row.matches(key))
            .map(Row::into_record))
    }

    fn name(&self) -> &str {
        "csv"
    }
}
