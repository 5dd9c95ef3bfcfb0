//! Checker routine abstraction
//!
//! A checker measures one quota in one region: it reads the limit, enumerates
//! the resources the quota counts, aggregates their usage and hands the result
//! to the reporting sink exactly once.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quota_guard_core::{CheckerId, Config, QuotaCheckResult, QuotaDescriptor, ThresholdRule};
use quota_guard_provider::CloudProvider;
use quota_guard_sinks::{Delivery, ReportingSink};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CheckResult;
use crate::lookup::QuotaLookup;

/// Tunables shared by every checker in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSettings {
    /// Upper bound on concurrent nested listing calls
    pub nested_concurrency: usize,
    /// Trailing window for metric-sourced checks
    pub metric_window: Duration,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            nested_concurrency: 1,
            metric_window: Duration::from_secs(5 * 60),
        }
    }
}

impl CheckSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            nested_concurrency: config.max_nested_calls.max(1),
            metric_window: Duration::from_secs(u64::from(config.metric_window_minutes.max(1)) * 60),
        }
    }
}

/// Everything a checker needs besides the request itself.
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub provider: Arc<dyn CloudProvider>,
    pub sink: Arc<dyn ReportingSink>,
    pub quotas: QuotaLookup,
    pub settings: CheckSettings,
}

impl CheckContext {
    pub fn new(
        provider: Arc<dyn CloudProvider>,
        sink: Arc<dyn ReportingSink>,
        settings: CheckSettings,
    ) -> Self {
        Self {
            quotas: QuotaLookup::new(provider.clone()),
            provider,
            sink,
            settings,
        }
    }
}

/// One checker invocation: which quota, where, and at what threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRequest {
    pub service_code: String,
    pub quota_code: String,
    pub threshold: Decimal,
    pub region: String,
}

impl CheckRequest {
    pub fn new(descriptor: &QuotaDescriptor, region: impl Into<String>) -> Self {
        Self {
            service_code: descriptor.service_code.clone(),
            quota_code: descriptor.quota_code.clone(),
            threshold: descriptor.threshold,
            region: region.into(),
        }
    }
}

/// How a checker turns individual resources into the reported usage value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageShape {
    /// Largest per-resource count; each crossing resource is listed
    PerResourceMax,
    /// One count for the whole region or account
    GlobalScalar,
    /// Latest metric sample per resource, then the largest of those
    MetricSourced,
}

/// Description of a registered checker, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct CheckerInfo {
    pub id: CheckerId,
    pub quota_code: String,
    pub service_code: String,
    pub description: String,
    pub rule: ThresholdRule,
    pub shape: UsageShape,
}

/// What a successful checker run produced.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub result: QuotaCheckResult,
    pub delivery: Delivery,
}

#[async_trait]
pub trait QuotaChecker: Send + Sync + Debug {
    /// Quota code this checker measures, e.g. `L-DFA99DE7`
    fn quota_code(&self) -> &'static str;

    /// Service the quota usually belongs to
    fn service_code(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// How the configured threshold is read
    fn threshold_rule(&self) -> ThresholdRule;

    fn shape(&self) -> UsageShape;

    fn id(&self) -> CheckerId {
        CheckerId::from_quota_code(self.quota_code())
    }

    fn info(&self) -> CheckerInfo {
        CheckerInfo {
            id: self.id(),
            quota_code: self.quota_code().to_string(),
            service_code: self.service_code().to_string(),
            description: self.description().to_string(),
            rule: self.threshold_rule(),
            shape: self.shape(),
        }
    }

    /// Enumerate and aggregate usage against an already resolved `limit`.
    async fn measure(
        &self,
        ctx: &CheckContext,
        request: &CheckRequest,
        limit: Decimal,
    ) -> CheckResult<QuotaCheckResult>;

    /// Resolve the limit, measure, and report the result once.
    async fn run(&self, ctx: &CheckContext, request: &CheckRequest) -> CheckResult<CheckReport> {
        let limit = ctx
            .quotas
            .limit(&request.region, &request.service_code, &request.quota_code)
            .await?;

        let result = self.measure(ctx, request, limit).await?;
        tracing::info!(
            quota_code = %result.quota_code,
            region = %result.region,
            usage = %result.usage_value,
            limit = %result.limit_value,
            threshold_crossed = result.threshold_crossed,
            "Quota usage measured"
        );

        let delivery = ctx.sink.report(&result).await;
        Ok(CheckReport { result, delivery })
    }
}
