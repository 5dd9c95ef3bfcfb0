#![allow(dead_code)]

use std::sync::Arc;

use quota_guard_checkers::{CheckContext, CheckRequest, CheckSettings};
use quota_guard_provider::{CloudProvider, FixtureData, FixtureProvider};
use quota_guard_sinks::{MemoryPublisher, MemoryUsageStore, ReportingSink, UsageSink};
use rust_decimal::Decimal;

pub const REGION: &str = "us-east-1";

/// Fixture provider wired to in-memory sinks.
pub struct Harness {
    pub provider: Arc<FixtureProvider>,
    pub store: Arc<MemoryUsageStore>,
    pub publisher: Arc<MemoryPublisher>,
    pub ctx: CheckContext,
}

impl Harness {
    pub fn new(fixture: serde_json::Value) -> Self {
        let data: FixtureData = serde_json::from_value(fixture).unwrap();
        Self::from_provider(FixtureProvider::new(data))
    }

    pub fn from_provider(provider: FixtureProvider) -> Self {
        let provider = Arc::new(provider);
        let store = Arc::new(MemoryUsageStore::new());
        let publisher = Arc::new(MemoryPublisher::new());
        let sink: Arc<dyn ReportingSink> =
            Arc::new(UsageSink::new(store.clone(), publisher.clone()));
        let cloud: Arc<dyn CloudProvider> = provider.clone();

        let settings = CheckSettings {
            nested_concurrency: 2,
            ..CheckSettings::default()
        };

        Self {
            ctx: CheckContext::new(cloud, sink, settings),
            provider,
            store,
            publisher,
        }
    }

    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        self.provider
            .calls()
            .into_iter()
            .filter(|call| call.starts_with(operation))
            .collect()
    }
}

pub fn request(service_code: &str, quota_code: &str, threshold: &str) -> CheckRequest {
    CheckRequest {
        service_code: service_code.to_string(),
        quota_code: quota_code.to_string(),
        threshold: dec(threshold),
        region: REGION.to_string(),
    }
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}
