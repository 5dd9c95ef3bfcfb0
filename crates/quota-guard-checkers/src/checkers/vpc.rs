//! VPC quotas

use async_trait::async_trait;
use futures::TryStreamExt;
use quota_guard_core::{QuotaCheckResult, ThresholdRule};
use quota_guard_provider::{paginate, MetricDatapoint, PeeringRole, ProviderResult};
use rust_decimal::Decimal;

use crate::aggregate::{global_scalar, PerResourceMax};
use crate::checker::{CheckContext, CheckRequest, QuotaChecker, UsageShape};
use crate::enumerate::{count, fan_out};
use crate::error::CheckResult;

/// Network Address Usage per VPC, from the latest CloudWatch sample
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkAddressUsage;

#[async_trait]
impl QuotaChecker for NetworkAddressUsage {
    fn quota_code(&self) -> &'static str {
        "L-BB24F6E5"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "Network Address Usage per VPC"
    }

    fn threshold_rule(&self) -> ThresholdRule {
        ThresholdRule::FRACTION_ABOVE
    }

    fn shape(&self) -> UsageShape {
        UsageShape::MetricSourced
    }

    async fn measure(
        &self,
        ctx: &CheckContext,
        request: &CheckRequest,
        limit: Decimal,
    ) -> CheckResult<QuotaCheckResult> {
        let provider = ctx.provider.as_ref();
        let region = request.region.as_str();
        let window = ctx.settings.metric_window;

        let vpcs: Vec<String> = paginate(move |token| provider.vpcs(region, token))
            .try_collect()
            .await?;

        let samples = fan_out(vpcs, ctx.settings.nested_concurrency, move |vpc_id| async move {
            let datapoints = provider
                .network_address_usage(region, &vpc_id, window)
                .await;
            (vpc_id, datapoints)
        })
        .await;

        let mut usage = PerResourceMax::new(request, self.threshold_rule(), limit);
        for (vpc_id, datapoints) in samples {
            let datapoints = match datapoints {
                Ok(datapoints) => datapoints,
                Err(e) => {
                    // One VPC without metrics does not invalidate the others
                    tracing::warn!(error = %e, vpc_id = %vpc_id, region = %region, "Skipping VPC");
                    continue;
                }
            };

            let Some(latest) = MetricDatapoint::latest(&datapoints) else {
                tracing::debug!(vpc_id = %vpc_id, "No Network Address Usage samples in window");
                continue;
            };

            match Decimal::try_from(latest.maximum) {
                Ok(value) => {
                    usage.observe(vpc_id, value.normalize());
                }
                Err(e) => {
                    tracing::warn!(error = %e, vpc_id = %vpc_id, sample = latest.maximum, "Unusable sample");
                }
            }
        }

        Ok(usage.finish())
    }
}

/// Addresses per NAT gateway
#[derive(Debug, Default, Clone, Copy)]
pub struct NatGatewayAddresses;

#[async_trait]
impl QuotaChecker for NatGatewayAddresses {
    fn quota_code(&self) -> &'static str {
        "L-DFA99DE7"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "IP addresses per NAT gateway"
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

        let mut gateways = paginate(move |token| provider.nat_gateways(region, token));
        while let Some(gateway) = gateways.try_next().await? {
            usage.observe(gateway.id, Decimal::from(gateway.address_count));
        }

        Ok(usage.finish())
    }
}

/// Active peering connections per VPC, counting both sides
#[derive(Debug, Default, Clone, Copy)]
pub struct PeeringConnections;

#[async_trait]
impl QuotaChecker for PeeringConnections {
    fn quota_code(&self) -> &'static str {
        "L-7E9ECCDB"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "Active VPC peering connections per VPC"
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

        let vpcs: Vec<String> = paginate(move |token| provider.vpcs(region, token))
            .try_collect()
            .await?;

        let counts = fan_out(vpcs, ctx.settings.nested_concurrency, move |vpc_id| async move {
            let vpc = vpc_id.as_str();
            let total: ProviderResult<usize> = async {
                let accepted = count(paginate(move |token| {
                    provider.vpc_peering_connections(region, vpc, PeeringRole::Accepter, token)
                }))
                .await?;
                let requested = count(paginate(move |token| {
                    provider.vpc_peering_connections(region, vpc, PeeringRole::Requester, token)
                }))
                .await?;
                Ok(accepted + requested)
            }
            .await;
            (vpc_id, total)
        })
        .await;

        let mut usage = PerResourceMax::new(request, self.threshold_rule(), limit);
        for (vpc_id, total) in counts {
            usage.observe(vpc_id, Decimal::from(total?));
        }

        Ok(usage.finish())
    }
}

/// Subnets per VPC
#[derive(Debug, Default, Clone, Copy)]
pub struct SubnetsPerVpc;

#[async_trait]
impl QuotaChecker for SubnetsPerVpc {
    fn quota_code(&self) -> &'static str {
        "L-407747CB"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "Subnets per VPC"
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

        let vpcs: Vec<String> = paginate(move |token| provider.vpcs(region, token))
            .try_collect()
            .await?;

        let counts = fan_out(vpcs, ctx.settings.nested_concurrency, move |vpc_id| async move {
            let vpc = vpc_id.as_str();
            let subnets = count(paginate(move |token| provider.subnets(region, vpc, token))).await;
            (vpc_id, subnets)
        })
        .await;

        let mut usage = PerResourceMax::new(request, self.threshold_rule(), limit);
        for (vpc_id, subnets) in counts {
            usage.observe(vpc_id, Decimal::from(subnets?));
        }

        Ok(usage.finish())
    }
}

/// Network interfaces in the region
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkInterfaces;

#[async_trait]
impl QuotaChecker for NetworkInterfaces {
    fn quota_code(&self) -> &'static str {
        "L-DF5E4CA3"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "Network interfaces per Region"
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

        let interfaces =
            count(paginate(move |token| provider.network_interfaces(region, token))).await?;

        Ok(global_scalar(
            request,
            self.threshold_rule(),
            limit,
            Decimal::from(interfaces),
        ))
    }
}

/// Gateway VPC endpoints in the region
#[derive(Debug, Default, Clone, Copy)]
pub struct GatewayEndpoints;

#[async_trait]
impl QuotaChecker for GatewayEndpoints {
    fn quota_code(&self) -> &'static str {
        "L-1B52E74A"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "Gateway VPC endpoints per Region"
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

        let endpoints = count(paginate(move |token| {
            provider.vpc_endpoints(region, "Gateway", token)
        }))
        .await?;

        Ok(global_scalar(
            request,
            self.threshold_rule(),
            limit,
            Decimal::from(endpoints),
        ))
    }
}

/// Egress-only internet gateways in the region
#[derive(Debug, Default, Clone, Copy)]
pub struct EgressOnlyGateways;

#[async_trait]
impl QuotaChecker for EgressOnlyGateways {
    fn quota_code(&self) -> &'static str {
        "L-45FE3B85"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "Egress-only internet gateways per Region"
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

        let gateways = count(paginate(move |token| {
            provider.egress_only_internet_gateways(region, token)
        }))
        .await?;

        Ok(global_scalar(
            request,
            self.threshold_rule(),
            limit,
            Decimal::from(gateways),
        ))
    }
}
