use std::collections::HashSet;

use async_trait::async_trait;
use futures::TryStreamExt;
use quota_guard_core::{QuotaCheckResult, ThresholdRule};
use quota_guard_provider::{
    paginate, ClassicLoadBalancer, CloudProvider, LoadBalancer, ProviderResult,
};
use rust_decimal::Decimal;

use crate::aggregate::global_scalar;
use crate::checker::{CheckContext, CheckRequest, QuotaChecker, UsageShape};
use crate::enumerate::fan_out;
use crate::error::CheckResult;

/// Instances registered behind classic and v2 load balancers in the region.
///
/// A failed listing of one load balancer family is logged and that family
/// counts as zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadBalancerInstances;

/// Distinct targets behind one v2 load balancer.
///
/// A target group or target health listing that fails is logged and left out;
/// the load balancer counts whatever could be read.
async fn registered_targets(
    provider: &dyn CloudProvider,
    region: &str,
    balancer: &LoadBalancer,
) -> usize {
    let arn = balancer.arn.as_str();
    let groups: Vec<String> = match paginate(move |token| provider.target_groups(region, arn, token))
        .try_collect()
        .await
    {
        Ok(groups) => groups,
        Err(e) => {
            tracing::warn!(
                error = %e,
                resource_id = %balancer.name,
                region = %region,
                "Skipping load balancer, target groups unavailable"
            );
            return 0;
        }
    };

    let mut targets = HashSet::new();
    for group in groups {
        match provider.target_health(region, &group).await {
            Ok(ids) => targets.extend(ids),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    resource_id = %group,
                    region = %region,
                    "Skipping target group, target health unavailable"
                );
            }
        }
    }
    targets.len()
}

#[async_trait]
impl QuotaChecker for LoadBalancerInstances {
    fn quota_code(&self) -> &'static str {
        "L-CE3125E5"
    }

    fn service_code(&self) -> &'static str {
        "elasticloadbalancing"
    }

    fn description(&self) -> &'static str {
        "Registered instances per Region across classic and v2 load balancers"
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

        let classic: ProviderResult<Vec<ClassicLoadBalancer>> =
            paginate(move |token| provider.classic_load_balancers(region, token))
                .try_collect()
                .await;
        let balancers: ProviderResult<Vec<LoadBalancer>> =
            paginate(move |token| provider.load_balancers(region, token))
                .try_collect()
                .await;

        // One family is enough to report; only both failing aborts the check.
        let (classic, balancers) = match (classic, balancers) {
            (Err(e), Err(_)) => return Err(e.into()),
            (Ok(classic), Err(e)) => {
                tracing::warn!(error = %e, region = %region, "Counting classic load balancers only");
                (classic, Vec::new())
            }
            (Err(e), Ok(balancers)) => {
                tracing::warn!(error = %e, region = %region, "Counting v2 load balancers only");
                (Vec::new(), balancers)
            }
            (Ok(classic), Ok(balancers)) => (classic, balancers),
        };

        let mut total: u64 = 0;
        for balancer in &classic {
            tracing::debug!(resource_id = %balancer.name, instances = balancer.instance_count, "Classic load balancer");
            total += u64::from(balancer.instance_count);
        }

        let counts = fan_out(
            balancers,
            ctx.settings.nested_concurrency,
            move |balancer| async move {
                let targets = registered_targets(provider, region, &balancer).await;
                (balancer, targets)
            },
        )
        .await;
        for (balancer, targets) in counts {
            tracing::debug!(resource_id = %balancer.name, instances = targets, "Load balancer");
            total += targets as u64;
        }

        Ok(global_scalar(
            request,
            self.threshold_rule(),
            limit,
            Decimal::from(total),
        ))
    }
}
