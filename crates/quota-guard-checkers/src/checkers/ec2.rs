use async_trait::async_trait;
use futures::TryStreamExt;
use quota_guard_core::{QuotaCheckResult, ThresholdRule};
use quota_guard_provider::{paginate, ClientVpnConnection, ProviderResult};
use rust_decimal::Decimal;

use crate::aggregate::PerResourceMax;
use crate::checker::{CheckContext, CheckRequest, QuotaChecker, UsageShape};
use crate::enumerate::{count, fan_out};
use crate::error::CheckResult;

/// Active connections per Client VPN endpoint
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientVpnConnections;

#[async_trait]
impl QuotaChecker for ClientVpnConnections {
    fn quota_code(&self) -> &'static str {
        "L-C4B238BF"
    }

    fn service_code(&self) -> &'static str {
        "ec2"
    }

    fn description(&self) -> &'static str {
        "Concurrent operations per Client VPN endpoint"
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

        let endpoints: Vec<String> =
            paginate(move |token| provider.client_vpn_endpoints(region, token))
                .try_collect()
                .await?;

        let counts = fan_out(
            endpoints,
            ctx.settings.nested_concurrency,
            move |endpoint_id| async move {
                let endpoint = endpoint_id.as_str();
                let connections: ProviderResult<Vec<ClientVpnConnection>> =
                    paginate(move |token| provider.client_vpn_connections(region, endpoint, token))
                        .try_collect()
                        .await;
                let active = connections.map(|connections| {
                    connections
                        .iter()
                        .filter(|connection| connection.is_active())
                        .count()
                });
                (endpoint_id, active)
            },
        )
        .await;

        let mut usage = PerResourceMax::new(request, self.threshold_rule(), limit);
        for (endpoint_id, active) in counts {
            usage.observe(endpoint_id, Decimal::from(active?));
        }

        Ok(usage.finish())
    }
}

/// Route tables per transit gateway
#[derive(Debug, Default, Clone, Copy)]
pub struct TransitGatewayRouteTables;

#[async_trait]
impl QuotaChecker for TransitGatewayRouteTables {
    fn quota_code(&self) -> &'static str {
        "L-43872EB7"
    }

    fn service_code(&self) -> &'static str {
        "ec2"
    }

    fn description(&self) -> &'static str {
        "Route tables per transit gateway"
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

        let gateways: Vec<String> = paginate(move |token| provider.transit_gateways(region, token))
            .try_collect()
            .await?;

        let counts = fan_out(
            gateways,
            ctx.settings.nested_concurrency,
            move |gateway_id| async move {
                let gateway = gateway_id.as_str();
                let tables = count(paginate(move |token| {
                    provider.transit_gateway_route_tables(region, gateway, token)
                }))
                .await;
                (gateway_id, tables)
            },
        )
        .await;

        let mut usage = PerResourceMax::new(request, self.threshold_rule(), limit);
        for (gateway_id, tables) in counts {
            usage.observe(gateway_id, Decimal::from(tables?));
        }

        Ok(usage.finish())
    }
}
