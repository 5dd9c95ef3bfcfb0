use async_trait::async_trait;
use quota_guard_core::ThresholdEvent;

use crate::traits::{EventPublisher, SinkResult};

/// Publisher used when no event bus is configured: the event goes to the log.
#[derive(Debug, Default, Clone)]
pub struct LogPublisher;

impl LogPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &ThresholdEvent) -> SinkResult<()> {
        let detail = event.detail_json()?;
        tracing::warn!(
            source = %event.source,
            detail_type = %event.detail_type,
            quota_code = %event.detail.quota_code,
            service_code = %event.detail.service_code,
            region = %event.detail.region,
            usage = %event.detail.usage_value,
            limit = %event.detail.limit_value,
            detail = %detail,
            "Quota threshold crossed"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
