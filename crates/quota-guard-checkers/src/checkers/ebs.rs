use async_trait::async_trait;
use futures::TryStreamExt;
use quota_guard_core::{QuotaCheckResult, ThresholdRule};
use quota_guard_provider::paginate;
use rust_decimal::Decimal;

use crate::aggregate::global_scalar;
use crate::checker::{CheckContext, CheckRequest, QuotaChecker, UsageShape};
use crate::error::CheckResult;

const GIB_PER_TIB: u64 = 1024;

/// Total gp2 storage in the region, in TiB
#[derive(Debug, Default, Clone, Copy)]
pub struct Gp2Storage;

#[async_trait]
impl QuotaChecker for Gp2Storage {
    fn quota_code(&self) -> &'static str {
        "L-D18FCD1D"
    }

    fn service_code(&self) -> &'static str {
        "ebs"
    }

    fn description(&self) -> &'static str {
        "Storage for General Purpose SSD (gp2) volumes, in TiB"
    }

    fn threshold_rule(&self) -> ThresholdRule {
        ThresholdRule::PERCENT_ABOVE
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

        let total_gib = paginate(move |token| provider.volumes(region, "gp2", token))
            .try_fold(0u64, |total, volume| async move {
                Ok(total.saturating_add(volume.size_gib))
            })
            .await?;

        // The limit is expressed in TiB
        let usage = Decimal::from(total_gib) / Decimal::from(GIB_PER_TIB);
        tracing::debug!(region = %region, total_gib, "gp2 storage");

        Ok(global_scalar(request, self.threshold_rule(), limit, usage))
    }
}
