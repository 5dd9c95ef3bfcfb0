use async_trait::async_trait;
use quota_guard_core::{QuotaCheckResult, ThresholdRule};
use quota_guard_provider::paginate;
use rust_decimal::Decimal;

use crate::aggregate::global_scalar;
use crate::checker::{CheckContext, CheckRequest, QuotaChecker, UsageShape};
use crate::enumerate::count;
use crate::error::CheckResult;

/// General purpose buckets in the account
#[derive(Debug, Default, Clone, Copy)]
pub struct Buckets;

#[async_trait]
impl QuotaChecker for Buckets {
    fn quota_code(&self) -> &'static str {
        "L-DC2B2D3D"
    }

    fn service_code(&self) -> &'static str {
        "s3"
    }

    fn description(&self) -> &'static str {
        "General purpose buckets"
    }

    fn threshold_rule(&self) -> ThresholdRule {
        ThresholdRule::PERCENT_AT_OR_ABOVE
    }

    fn shape(&self) -> UsageShape {
        UsageShape::GlobalScalar
    }

    async fn measure(
        &self,
        ctx: &CheckContext,
        request: &CheckRequest,
        limit: Decimal,
    ) -> CheckResult<QuotaCheckResult> {
        let provider = ctx.provider.as_ref();
        let region = request.region.as_str();

        let buckets = count(paginate(move |token| provider.buckets(region, token))).await?;

        Ok(global_scalar(
            request,
            self.threshold_rule(),
            limit,
            Decimal::from(buckets),
        ))
    }
}
