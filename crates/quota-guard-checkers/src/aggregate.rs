//! Usage aggregators

use quota_guard_core::{CrossingResource, QuotaCheckResult, ThresholdRule};
use rust_decimal::Decimal;

use crate::checker::CheckRequest;

/// Per-resource maximum.
///
/// Reports the largest observed usage; the threshold is crossed when any single
/// resource crosses it, and every such resource is listed in enumeration order.
#[derive(Debug, Clone)]
pub struct PerResourceMax {
    request: CheckRequest,
    rule: ThresholdRule,
    limit: Decimal,
    max: Decimal,
    crossing: Vec<CrossingResource>,
}

impl PerResourceMax {
    pub fn new(request: &CheckRequest, rule: ThresholdRule, limit: Decimal) -> Self {
        Self {
            request: request.clone(),
            rule,
            limit,
            max: Decimal::ZERO,
            crossing: Vec::new(),
        }
    }

    /// Record one resource's usage. Returns whether it crosses the threshold.
    pub fn observe(&mut self, resource_id: impl Into<String>, usage: Decimal) -> bool {
        let resource_id = resource_id.into();
        tracing::debug!(
            quota_code = %self.request.quota_code,
            resource_id = %resource_id,
            usage = %usage,
            "Resource usage"
        );

        if usage > self.max {
            self.max = usage;
        }

        let crossed = self.rule.crosses(usage, self.limit, self.request.threshold);
        if crossed {
            tracing::warn!(
                quota_code = %self.request.quota_code,
                region = %self.request.region,
                resource_id = %resource_id,
                usage = %usage,
                limit = %self.limit,
                threshold_percent = %self.rule.threshold_percent(self.request.threshold),
                "Resource exceeds quota threshold"
            );
            self.crossing.push(CrossingResource::new(resource_id, usage));
        }
        crossed
    }

    pub fn finish(self) -> QuotaCheckResult {
        QuotaCheckResult {
            threshold_crossed: !self.crossing.is_empty(),
            region: self.request.region,
            service_code: self.request.service_code,
            quota_code: self.request.quota_code,
            limit_value: self.limit,
            usage_value: self.max,
            crossing_resources: self.crossing,
        }
    }
}

/// Single account- or region-wide usage value. No resources are listed.
pub fn global_scalar(
    request: &CheckRequest,
    rule: ThresholdRule,
    limit: Decimal,
    usage: Decimal,
) -> QuotaCheckResult {
    let threshold_crossed = rule.crosses(usage, limit, request.threshold);
    if threshold_crossed {
        tracing::warn!(
            quota_code = %request.quota_code,
            region = %request.region,
            usage = %usage,
            limit = %limit,
            threshold_percent = %rule.threshold_percent(request.threshold),
            "Usage exceeds quota threshold"
        );
    }

    QuotaCheckResult {
        region: request.region.clone(),
        service_code: request.service_code.clone(),
        quota_code: request.quota_code.clone(),
        limit_value: limit,
        usage_value: usage,
        crossing_resources: Vec::new(),
        threshold_crossed,
    }
}
