use async_trait::async_trait;
use futures::TryStreamExt;
use quota_guard_core::{QuotaCheckResult, ThresholdRule};
use quota_guard_provider::{paginate, Role};
use rust_decimal::Decimal;

use crate::aggregate::{global_scalar, PerResourceMax};
use crate::checker::{CheckContext, CheckRequest, QuotaChecker, UsageShape};
use crate::enumerate::{count, fan_out};
use crate::error::CheckResult;

/// Managed policies attached per role
#[derive(Debug, Default, Clone, Copy)]
pub struct RolePolicies;

#[async_trait]
impl QuotaChecker for RolePolicies {
    fn quota_code(&self) -> &'static str {
        "L-0DA4ABF3"
    }

    fn service_code(&self) -> &'static str {
        "iam"
    }

    fn description(&self) -> &'static str {
        "Managed policies per role"
    }

    fn threshold_rule(&self) -> ThresholdRule {
        ThresholdRule::PERCENT_ABOVE
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

        let roles: Vec<Role> = paginate(move |token| provider.roles(region, token))
            .try_collect()
            .await?;

        let counts = fan_out(roles, ctx.settings.nested_concurrency, move |role| async move {
            let name = role.name.as_str();
            let policies = count(paginate(move |token| {
                provider.attached_role_policies(region, name, token)
            }))
            .await;
            (role.arn, policies)
        })
        .await;

        let mut usage = PerResourceMax::new(request, self.threshold_rule(), limit);
        for (role_arn, policies) in counts {
            usage.observe(role_arn, Decimal::from(policies?));
        }

        Ok(usage.finish())
    }
}

/// IAM server certificates in the account
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerCertificates;

#[async_trait]
impl QuotaChecker for ServerCertificates {
    fn quota_code(&self) -> &'static str {
        "L-BF35879D"
    }

    fn service_code(&self) -> &'static str {
        "iam"
    }

    fn description(&self) -> &'static str {
        "Server certificates per account"
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

        let certificates =
            count(paginate(move |token| provider.server_certificates(region, token))).await?;

        Ok(global_scalar(
            request,
            self.threshold_rule(),
            limit,
            Decimal::from(certificates),
        ))
    }
}
