//! AWS SDK backed provider
//!
//! One shared SDK configuration is loaded per region on first use; service
//! clients are cheap to build from it.

mod cloudwatch;
mod ec2;
mod elb;
mod es;
mod iam;
mod quotas;
mod s3;

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ec2::error::DisplayErrorContext;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::CloudProvider;
use crate::types::{
    ClassicLoadBalancer, ClientVpnConnection, LoadBalancer, MetricDatapoint, NatGateway, Page,
    PeeringRole, Role, SearchDomain, Volume,
};

/// Live provider talking to the AWS APIs
pub struct AwsProvider {
    configs: Mutex<HashMap<String, SdkConfig>>,
}

impl Default for AwsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for AwsProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AwsProvider").finish()
    }
}

impl AwsProvider {
    pub fn new() -> Self {
        Self {
            configs: Mutex::new(HashMap::new()),
        }
    }

    /// Shared SDK configuration for `region`, loaded once.
    pub async fn sdk_config(&self, region: &str) -> SdkConfig {
        let mut configs = self.configs.lock().await;
        if let Some(config) = configs.get(region) {
            return config.clone();
        }

        tracing::debug!(region = %region, "Loading AWS configuration");
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        configs.insert(region.to_string(), config.clone());
        config
    }

    async fn ec2(&self, region: &str) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(&self.sdk_config(region).await)
    }

    async fn elb(&self, region: &str) -> aws_sdk_elasticloadbalancing::Client {
        aws_sdk_elasticloadbalancing::Client::new(&self.sdk_config(region).await)
    }

    async fn elbv2(&self, region: &str) -> aws_sdk_elasticloadbalancingv2::Client {
        aws_sdk_elasticloadbalancingv2::Client::new(&self.sdk_config(region).await)
    }

    async fn es(&self, region: &str) -> aws_sdk_elasticsearch::Client {
        aws_sdk_elasticsearch::Client::new(&self.sdk_config(region).await)
    }

    async fn iam(&self, region: &str) -> aws_sdk_iam::Client {
        aws_sdk_iam::Client::new(&self.sdk_config(region).await)
    }

    async fn s3(&self, region: &str) -> aws_sdk_s3::Client {
        aws_sdk_s3::Client::new(&self.sdk_config(region).await)
    }

    async fn quotas(&self, region: &str) -> aws_sdk_servicequotas::Client {
        aws_sdk_servicequotas::Client::new(&self.sdk_config(region).await)
    }

    async fn cloudwatch(&self, region: &str) -> aws_sdk_cloudwatch::Client {
        aws_sdk_cloudwatch::Client::new(&self.sdk_config(region).await)
    }
}

/// Map an SDK error to [`ProviderError::Api`] with the full error chain.
pub(crate) fn api_error<E>(operation: &'static str) -> impl FnOnce(E) -> ProviderError
where
    E: std::error::Error,
{
    move |err| ProviderError::api(operation, DisplayErrorContext(err).to_string())
}

/// Continuation token, treating an empty string as the end of the listing.
pub(crate) fn next_token(token: Option<&str>) -> Option<String> {
    token.filter(|token| !token.is_empty()).map(str::to_string)
}

pub(crate) fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}


#[async_trait]
impl CloudProvider for AwsProvider {
    fn name(&self) -> &str {
        "aws"
    }

    async fn service_quota(
        &self,
        region: &str,
        service_code: &str,
        quota_code: &str,
    ) -> ProviderResult<Decimal> {
        quotas::applied(&self.quotas(region).await, service_code, quota_code).await
    }

    async fn default_service_quota(
        &self,
        region: &str,
        service_code: &str,
        quota_code: &str,
    ) -> ProviderResult<Decimal> {
        quotas::default(&self.quotas(region).await, service_code, quota_code).await
    }

    async fn search_domains(
        &self,
        region: &str,
        _next_token: Option<String>,
    ) -> ProviderResult<Page<SearchDomain>> {
        es::search_domains(&self.es(region).await).await
    }

    async fn vpcs(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::vpcs(&self.ec2(region).await, next_token).await
    }

    async fn network_address_usage(
        &self,
        region: &str,
        vpc_id: &str,
        window: Duration,
    ) -> ProviderResult<Vec<MetricDatapoint>> {
        cloudwatch::network_address_usage(&self.cloudwatch(region).await, vpc_id, window).await
    }

    async fn nat_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<NatGateway>> {
        ec2::nat_gateways(&self.ec2(region).await, next_token).await
    }

    async fn client_vpn_endpoints(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::client_vpn_endpoints(&self.ec2(region).await, next_token).await
    }

    async fn client_vpn_connections(
        &self,
        region: &str,
        endpoint_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<ClientVpnConnection>> {
        ec2::client_vpn_connections(&self.ec2(region).await, endpoint_id, next_token).await
    }

    async fn vpc_peering_connections(
        &self,
        region: &str,
        vpc_id: &str,
        role: PeeringRole,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::vpc_peering_connections(&self.ec2(region).await, vpc_id, role, next_token).await
    }

    async fn subnets(
        &self,
        region: &str,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::subnets(&self.ec2(region).await, vpc_id, next_token).await
    }

    async fn network_interfaces(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::network_interfaces(&self.ec2(region).await, next_token).await
    }

    async fn volumes(
        &self,
        region: &str,
        volume_type: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Volume>> {
        ec2::volumes(&self.ec2(region).await, volume_type, next_token).await
    }

    async fn classic_load_balancers(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<ClassicLoadBalancer>> {
        elb::classic_load_balancers(&self.elb(region).await, next_token).await
    }

    async fn load_balancers(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<LoadBalancer>> {
        elb::load_balancers(&self.elbv2(region).await, next_token).await
    }

    async fn target_groups(
        &self,
        region: &str,
        load_balancer_arn: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        elb::target_groups(&self.elbv2(region).await, load_balancer_arn, next_token).await
    }

    async fn target_health(
        &self,
        region: &str,
        target_group_arn: &str,
    ) -> ProviderResult<Vec<String>> {
        elb::target_health(&self.elbv2(region).await, target_group_arn).await
    }

    async fn transit_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::transit_gateways(&self.ec2(region).await, next_token).await
    }

    async fn transit_gateway_route_tables(
        &self,
        region: &str,
        transit_gateway_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::transit_gateway_route_tables(&self.ec2(region).await, transit_gateway_id, next_token)
            .await
    }

    async fn vpc_endpoints(
        &self,
        region: &str,
        endpoint_type: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::vpc_endpoints(&self.ec2(region).await, endpoint_type, next_token).await
    }

    async fn egress_only_internet_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        ec2::egress_only_internet_gateways(&self.ec2(region).await, next_token).await
    }

    async fn buckets(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        s3::buckets(&self.s3(region).await, next_token).await
    }

    async fn roles(&self, region: &str, next_token: Option<String>) -> ProviderResult<Page<Role>> {
        iam::roles(&self.iam(region).await, next_token).await
    }

    async fn attached_role_policies(
        &self,
        region: &str,
        role_name: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        iam::attached_role_policies(&self.iam(region).await, role_name, next_token).await
    }

    async fn server_certificates(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        iam::server_certificates(&self.iam(region).await, next_token).await
    }
}
