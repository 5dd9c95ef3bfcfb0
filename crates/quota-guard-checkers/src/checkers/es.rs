use async_trait::async_trait;
use futures::TryStreamExt;
use quota_guard_core::{QuotaCheckResult, ThresholdRule};
use quota_guard_provider::paginate;
use rust_decimal::Decimal;

use crate::aggregate::PerResourceMax;
use crate::checker::{CheckContext, CheckRequest, QuotaChecker, UsageShape};
use crate::error::CheckResult;

/// Instances per search domain
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchDomainInstances;

#[async_trait]
impl QuotaChecker for SearchDomainInstances {
    fn quota_code(&self) -> &'static str {
        "L-6408ABDE"
    }

    fn service_code(&self) -> &'static str {
        "es"
    }

    fn description(&self) -> &'static str {
        "Instances per search domain"
    }

    fn threshold_rule(&self) -> ThresholdRule {
        ThresholdRule::FRACTION_ABOVE
    }

    fn shape(&self) -> UsageShape {
        UsageShape::PerResourceMax
    }

    async fn measure(
        &self,
        ctx: &CheckContext,
        request: &CheckRequest,
        limit: Decimal,
    ) -> CheckResult<QuotaCheckResult> {
        let provider = ctx.provider.as_ref();
        let region = request.region.as_str();
        let mut usage = PerResourceMax::new(request, self.threshold_rule(), limit);

        let mut domains = paginate(move |token| provider.search_domains(region, token));
        while let Some(domain) = domains.try_next().await? {
            usage.observe(domain.id, Decimal::from(domain.instance_count));
        }

        Ok(usage.finish())
    }
}
