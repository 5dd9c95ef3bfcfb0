//! EventBridge event publisher

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_eventbridge::error::DisplayErrorContext;
use aws_sdk_eventbridge::types::PutEventsRequestEntry;
use aws_sdk_eventbridge::Client;
use quota_guard_core::ThresholdEvent;

use crate::traits::{EventPublisher, SinkError, SinkResult};

/// Publishes threshold events to one event bus
#[derive(Debug, Clone)]
pub struct EventBridgePublisher {
    client: Client,
    bus: String,
}

impl EventBridgePublisher {
    pub async fn new(bus: impl Into<String>, region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::from_conf(&config, bus)
    }

    pub fn from_conf(config: &SdkConfig, bus: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            bus: bus.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for EventBridgePublisher {
    async fn publish(&self, event: &ThresholdEvent) -> SinkResult<()> {
        let entry = PutEventsRequestEntry::builder()
            .source(&event.source)
            .detail_type(&event.detail_type)
            .detail(event.detail_json()?)
            .event_bus_name(&self.bus)
            .build();

        let output = self
            .client
            .put_events()
            .entries(entry)
            .send()
            .await
            .map_err(|e| {
                SinkError::PublishFailed(format!("put_events to {}: {}", self.bus, DisplayErrorContext(e)))
            })?;

        // Per-entry failures come back in a successful response
        if let Some(failed) = output.entries().iter().find(|entry| entry.error_code().is_some()) {
            return Err(SinkError::PublishFailed(format!(
                "{}: {}",
                failed.error_code().unwrap_or_default(),
                failed.error_message().unwrap_or_default()
            )));
        }

        tracing::debug!(bus = %self.bus, "Event accepted");
        Ok(())
    }

    fn name(&self) -> &str {
        "eventbridge"
    }
}
