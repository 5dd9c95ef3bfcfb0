//! Cloud provider abstraction

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::ProviderResult;
use crate::types::{
    ClassicLoadBalancer, ClientVpnConnection, LoadBalancer, MetricDatapoint, NatGateway, Page,
    PeeringRole, Role, SearchDomain, Volume,
};

/// Read-only view of a cloud account, one region at a time.
///
/// Listing operations take the continuation token of the previous page (`None`
/// for the first page) and are meant to be driven through
/// [`paginate`](crate::paginate). Account-wide families (IAM, S3 buckets)
/// accept the region and ignore it.
#[async_trait]
pub trait CloudProvider: Send + Sync + Debug {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Limit currently applied to the account.
    async fn service_quota(
        &self,
        region: &str,
        service_code: &str,
        quota_code: &str,
    ) -> ProviderResult<Decimal>;

    /// Provider default limit, used when the applied limit is unavailable.
    async fn default_service_quota(
        &self,
        region: &str,
        service_code: &str,
        quota_code: &str,
    ) -> ProviderResult<Decimal>;

    async fn search_domains(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<SearchDomain>>;

    /// VPC identifiers.
    async fn vpcs(&self, region: &str, next_token: Option<String>)
        -> ProviderResult<Page<String>>;

    /// Network Address Usage samples for one VPC over the trailing `window`.
    async fn network_address_usage(
        &self,
        region: &str,
        vpc_id: &str,
        window: Duration,
    ) -> ProviderResult<Vec<MetricDatapoint>>;

    async fn nat_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<NatGateway>>;

    /// Client VPN endpoint identifiers.
    async fn client_vpn_endpoints(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    async fn client_vpn_connections(
        &self,
        region: &str,
        endpoint_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<ClientVpnConnection>>;

    /// Peering connection identifiers where `vpc_id` plays `role`.
    async fn vpc_peering_connections(
        &self,
        region: &str,
        vpc_id: &str,
        role: PeeringRole,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// Subnet identifiers of one VPC.
    async fn subnets(
        &self,
        region: &str,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// Network interface identifiers.
    async fn network_interfaces(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// Volumes of one type, e.g. `gp2`.
    async fn volumes(
        &self,
        region: &str,
        volume_type: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Volume>>;

    async fn classic_load_balancers(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<ClassicLoadBalancer>>;

    /// Application, network and gateway load balancers.
    async fn load_balancers(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<LoadBalancer>>;

    /// Target group ARNs attached to one load balancer.
    async fn target_groups(
        &self,
        region: &str,
        load_balancer_arn: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// Target identifiers registered in one target group.
    async fn target_health(
        &self,
        region: &str,
        target_group_arn: &str,
    ) -> ProviderResult<Vec<String>>;

    /// Transit gateway identifiers.
    async fn transit_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// Route table identifiers of one transit gateway.
    async fn transit_gateway_route_tables(
        &self,
        region: &str,
        transit_gateway_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// VPC endpoint identifiers of one endpoint type, e.g. `Gateway`.
    async fn vpc_endpoints(
        &self,
        region: &str,
        endpoint_type: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    async fn egress_only_internet_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// Bucket names in the account.
    async fn buckets(&self, region: &str, next_token: Option<String>)
        -> ProviderResult<Page<String>>;

    async fn roles(&self, region: &str, next_token: Option<String>) -> ProviderResult<Page<Role>>;

    /// Managed policy ARNs attached to one role.
    async fn attached_role_policies(
        &self,
        region: &str,
        role_name: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;

    /// Server certificate names.
    async fn server_certificates(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>>;
}
