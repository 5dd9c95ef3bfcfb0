//! Persist-then-notify reporting sink

use std::sync::Arc;

use async_trait::async_trait;
use quota_guard_core::{QuotaCheckResult, ThresholdEvent, UsageRecord};

use crate::traits::{Delivery, EventPublisher, Notification, ReportingSink, UsageStore};

/// Writes the usage record, then publishes a threshold event if the result
/// crossed its threshold and the write succeeded.
#[derive(Debug, Clone)]
pub struct UsageSink {
    store: Arc<dyn UsageStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl UsageSink {
    pub fn new(store: Arc<dyn UsageStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    pub fn store(&self) -> &Arc<dyn UsageStore> {
        &self.store
    }

    async fn persist(&self, result: &QuotaCheckResult) -> bool {
        let record = match UsageRecord::from_result(result) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    quota_code = %result.quota_code,
                    region = %result.region,
                    "Failed to build usage record"
                );
                return false;
            }
        };

        match self.store.upsert(record).await {
            Ok(()) => {
                tracing::info!(
                    store = self.store.name(),
                    quota_code = %result.quota_code,
                    service_code = %result.service_code,
                    region = %result.region,
                    usage = %result.usage_value,
                    limit = %result.limit_value,
                    "Quota usage updated"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    store = self.store.name(),
                    quota_code = %result.quota_code,
                    region = %result.region,
                    "Failed to write quota usage"
                );
                false
            }
        }
    }
}

#[async_trait]
impl ReportingSink for UsageSink {
    async fn report(&self, result: &QuotaCheckResult) -> Delivery {
        let persisted = self.persist(result).await;

        let notification = if !result.threshold_crossed {
            Notification::NotRequired
        } else if !persisted {
            tracing::warn!(
                quota_code = %result.quota_code,
                region = %result.region,
                "Threshold crossed but usage was not persisted; event not sent"
            );
            Notification::Skipped
        } else {
            let event = ThresholdEvent::from_result(result);
            match self.publisher.publish(&event).await {
                Ok(()) => {
                    tracing::info!(
                        publisher = self.publisher.name(),
                        quota_code = %result.quota_code,
                        service_code = %result.service_code,
                        region = %result.region,
                        "Quota threshold event sent"
                    );
                    Notification::Published
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        publisher = self.publisher.name(),
                        quota_code = %result.quota_code,
                        region = %result.region,
                        "Failed to send quota threshold event"
                    );
                    Notification::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };

        Delivery {
            persisted,
            notification,
        }
    }
}
