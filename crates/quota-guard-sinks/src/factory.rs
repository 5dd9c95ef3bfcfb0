#[cfg(feature = "dynamodb")]
use crate::DynamoUsageStore;
#[cfg(feature = "eventbridge")]
use crate::EventBridgePublisher;
use crate::{
    CsvUsageStore, EventPublisher, LogPublisher, MemoryUsageStore, ReportingSink, SinkBackend,
    SinkError, SinkResult, UsageSink, UsageStore,
};
use quota_guard_core::Config;
use std::sync::Arc;

/// Create the usage store selected by configuration
pub async fn create_store(config: &Config) -> SinkResult<Arc<dyn UsageStore>> {
    match config.sink {
        #[cfg(feature = "dynamodb")]
        SinkBackend::DynamoDb => {
            let table = config
                .ddb_table
                .clone()
                .ok_or_else(|| SinkError::ConfigError("DDB_TABLE not configured".to_string()))?;

            let store = DynamoUsageStore::new(table, &config.current_region).await;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "dynamodb"))]
        SinkBackend::DynamoDb => Err(SinkError::ConfigError(
            "DynamoDB sink not available (dynamodb feature not enabled)".to_string(),
        )),

        SinkBackend::Csv => {
            let store = CsvUsageStore::new(config.csv_path.clone()).await?;
            Ok(Arc::new(store))
        }

        SinkBackend::Memory => Ok(Arc::new(MemoryUsageStore::new())),
    }
}

/// Create the event publisher: the configured bus, or the log when none is set
pub async fn create_publisher(config: &Config) -> SinkResult<Arc<dyn EventPublisher>> {
    match config.event_bus.as_deref() {
        #[cfg(feature = "eventbridge")]
        Some(bus) => {
            let publisher = EventBridgePublisher::new(bus, &config.current_region).await;
            Ok(Arc::new(publisher))
        }

        #[cfg(not(feature = "eventbridge"))]
        Some(_) => Err(SinkError::ConfigError(
            "EventBridge publisher not available (eventbridge feature not enabled)".to_string(),
        )),

        None => Ok(Arc::new(LogPublisher::new())),
    }
}

/// Create the reporting sink for a run
pub async fn create_sink(config: &Config) -> SinkResult<Arc<dyn ReportingSink>> {
    let store = create_store(config).await?;
    let publisher = create_publisher(config).await?;

    tracing::info!(
        store = store.name(),
        publisher = publisher.name(),
        "Reporting sink ready"
    );
    Ok(Arc::new(UsageSink::new(store, publisher)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: std::collections::HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[tokio::test]
    async fn csv_backend_builds_csv_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.csv");
        let config = config(&[("USAGE_SINK", "csv"), ("QUOTA_CSV_PATH", path.to_str().unwrap())]);

        let store = create_store(&config).await.unwrap();
        assert_eq!(store.name(), "csv");
    }

    #[tokio::test]
    async fn publisher_defaults_to_log() {
        let config = config(&[("USAGE_SINK", "memory")]);
        let publisher = create_publisher(&config).await.unwrap();
        assert_eq!(publisher.name(), "log");
    }

    #[cfg(feature = "dynamodb")]
    #[tokio::test]
    async fn dynamodb_backend_requires_table() {
        let config = config(&[("USAGE_SINK", "dynamodb")]);
        assert!(matches!(
            create_store(&config).await,
            Err(SinkError::ConfigError(_))
        ));
    }
}
