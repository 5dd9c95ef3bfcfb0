//! Canned provider backed by a JSON document
//!
//! Every listing answers from [`FixtureData`] regardless of region. Pages are
//! split by `page_size` when set, so pagination is exercised the same way it is
//! against the live provider. Failures are injected with `fail_on` keys of the
//! form `operation` or `operation:resource`, e.g. `describe_target_health:tg-2`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::CloudProvider;
use crate::types::{
    ClassicLoadBalancer, ClientVpnConnection, LoadBalancer, MetricDatapoint, NatGateway, Page,
    PeeringRole, Role, SearchDomain, Volume,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureQuota {
    pub service_code: String,
    pub quota_code: String,
    /// Applied limit; lookups fail when absent
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub default_value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixturePeering {
    pub id: String,
    pub accepter_vpc_id: String,
    pub requester_vpc_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureEndpoint {
    pub id: String,
    pub endpoint_type: String,
}

/// Canned account contents. Nested listings are keyed by their parent id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureData {
    pub quotas: Vec<FixtureQuota>,
    pub search_domains: Vec<SearchDomain>,
    pub vpcs: Vec<String>,
    pub network_address_usage: HashMap<String, Vec<MetricDatapoint>>,
    pub nat_gateways: Vec<NatGateway>,
    pub client_vpn_endpoints: Vec<String>,
    pub client_vpn_connections: HashMap<String, Vec<ClientVpnConnection>>,
    pub vpc_peering_connections: Vec<FixturePeering>,
    pub subnets: HashMap<String, Vec<String>>,
    pub network_interfaces: Vec<String>,
    pub volumes: Vec<Volume>,
    pub classic_load_balancers: Vec<ClassicLoadBalancer>,
    pub load_balancers: Vec<LoadBalancer>,
    pub target_groups: HashMap<String, Vec<String>>,
    pub target_health: HashMap<String, Vec<String>>,
    pub transit_gateways: Vec<String>,
    pub transit_gateway_route_tables: HashMap<String, Vec<String>>,
    pub vpc_endpoints: Vec<FixtureEndpoint>,
    pub egress_only_internet_gateways: Vec<String>,
    pub buckets: Vec<String>,
    pub roles: Vec<Role>,
    pub attached_role_policies: HashMap<String, Vec<String>>,
    pub server_certificates: Vec<String>,
    /// Operations that fail when called
    pub fail_on: Vec<String>,
    /// Items per page; everything comes back in one page when unset
    pub page_size: Option<usize>,
}

#[derive(Debug)]
pub struct FixtureProvider {
    data: FixtureData,
    calls: Mutex<Vec<String>>,
}

impl FixtureProvider {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json(bytes: &[u8]) -> ProviderResult<Self> {
        Ok(Self::new(serde_json::from_slice(bytes)?))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Self::from_json(&bytes)
    }

    /// Make calls matching `key` fail.
    pub fn with_failure(mut self, key: impl Into<String>) -> Self {
        self.data.fail_on.push(key.into());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.data.page_size = Some(page_size);
        self
    }

    /// Calls made so far, as `operation@region` or `operation:resource@region`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn enter(&self, operation: &str, resource: Option<&str>, region: &str) -> ProviderResult<()> {
        let key = match resource {
            Some(resource) => format!("{operation}:{resource}"),
            None => operation.to_string(),
        };

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{key}@{region}"));
        }

        if self
            .data
            .fail_on
            .iter()
            .any(|failing| failing == operation || *failing == key)
        {
            return Err(ProviderError::api(key, "injected failure"));
        }
        Ok(())
    }

    fn page<T: Clone>(&self, items: &[T], next_token: Option<String>) -> ProviderResult<Page<T>> {
        let page_size = match self.data.page_size {
            Some(size) if size > 0 => size,
            _ => return Ok(Page::last(items.to_vec())),
        };

        let start = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ProviderError::Fixture(format!("invalid page token {token}")))?,
            None => 0,
        };
        let start = start.min(items.len());
        let end = (start + page_size).min(items.len());
        let next_token = (end < items.len()).then(|| end.to_string());

        Ok(Page::new(items[start..end].to_vec(), next_token))
    }

    fn nested<'a>(map: &'a HashMap<String, Vec<String>>, parent: &str) -> &'a [String] {
        map.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    fn quota(&self, service_code: &str, quota_code: &str) -> Option<&FixtureQuota> {
        self.data
            .quotas
            .iter()
            .find(|quota| quota.service_code == service_code && quota.quota_code == quota_code)
    }
}

fn quota_not_found(service_code: &str, quota_code: &str) -> ProviderError {
    ProviderError::QuotaNotFound {
        service_code: service_code.to_string(),
        quota_code: quota_code.to_string(),
    }
}

#[async_trait]
impl CloudProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn service_quota(
        &self,
        region: &str,
        service_code: &str,
        quota_code: &str,
    ) -> ProviderResult<Decimal> {
        self.enter("get_service_quota", Some(quota_code), region)?;
        self.quota(service_code, quota_code)
            .and_then(|quota| quota.value)
            .ok_or_else(|| quota_not_found(service_code, quota_code))
    }

    async fn default_service_quota(
        &self,
        region: &str,
        service_code: &str,
        quota_code: &str,
    ) -> ProviderResult<Decimal> {
        self.enter("get_aws_default_service_quota", Some(quota_code), region)?;
        self.quota(service_code, quota_code)
            .and_then(|quota| quota.default_value)
            .ok_or_else(|| quota_not_found(service_code, quota_code))
    }

    async fn search_domains(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<SearchDomain>> {
        self.enter("describe_elasticsearch_domains", None, region)?;
        self.page(&self.data.search_domains, next_token)
    }

    async fn vpcs(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_vpcs", None, region)?;
        self.page(&self.data.vpcs, next_token)
    }

    async fn network_address_usage(
        &self,
        region: &str,
        vpc_id: &str,
        _window: Duration,
    ) -> ProviderResult<Vec<MetricDatapoint>> {
        self.enter("get_metric_statistics", Some(vpc_id), region)?;
        Ok(self
            .data
            .network_address_usage
            .get(vpc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn nat_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<NatGateway>> {
        self.enter("describe_nat_gateways", None, region)?;
        self.page(&self.data.nat_gateways, next_token)
    }

    async fn client_vpn_endpoints(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_client_vpn_endpoints", None, region)?;
        self.page(&self.data.client_vpn_endpoints, next_token)
    }

    async fn client_vpn_connections(
        &self,
        region: &str,
        endpoint_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<ClientVpnConnection>> {
        self.enter("describe_client_vpn_connections", Some(endpoint_id), region)?;
        let connections = self
            .data
            .client_vpn_connections
            .get(endpoint_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        self.page(connections, next_token)
    }

    async fn vpc_peering_connections(
        &self,
        region: &str,
        vpc_id: &str,
        role: PeeringRole,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_vpc_peering_connections", Some(vpc_id), region)?;
        let ids: Vec<String> = self
            .data
            .vpc_peering_connections
            .iter()
            .filter(|peering| match role {
                PeeringRole::Accepter => peering.accepter_vpc_id == vpc_id,
                PeeringRole::Requester => peering.requester_vpc_id == vpc_id,
            })
            .map(|peering| peering.id.clone())
            .collect();
        self.page(&ids, next_token)
    }

    async fn subnets(
        &self,
        region: &str,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_subnets", Some(vpc_id), region)?;
        self.page(Self::nested(&self.data.subnets, vpc_id), next_token)
    }

    async fn network_interfaces(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_network_interfaces", None, region)?;
        self.page(&self.data.network_interfaces, next_token)
    }

    async fn volumes(
        &self,
        region: &str,
        volume_type: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Volume>> {
        self.enter("describe_volumes", Some(volume_type), region)?;
        let volumes: Vec<Volume> = self
            .data
            .volumes
            .iter()
            .filter(|volume| volume.volume_type == volume_type)
            .cloned()
            .collect();
        self.page(&volumes, next_token)
    }

    async fn classic_load_balancers(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<ClassicLoadBalancer>> {
        self.enter("describe_classic_load_balancers", None, region)?;
        self.page(&self.data.classic_load_balancers, next_token)
    }

    async fn load_balancers(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<LoadBalancer>> {
        self.enter("describe_load_balancers", None, region)?;
        self.page(&self.data.load_balancers, next_token)
    }

    async fn target_groups(
        &self,
        region: &str,
        load_balancer_arn: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_target_groups", Some(load_balancer_arn), region)?;
        self.page(
            Self::nested(&self.data.target_groups, load_balancer_arn),
            next_token,
        )
    }

    async fn target_health(
        &self,
        region: &str,
        target_group_arn: &str,
    ) -> ProviderResult<Vec<String>> {
        self.enter("describe_target_health", Some(target_group_arn), region)?;
        Ok(Self::nested(&self.data.target_health, target_group_arn).to_vec())
    }

    async fn transit_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_transit_gateways", None, region)?;
        self.page(&self.data.transit_gateways, next_token)
    }

    async fn transit_gateway_route_tables(
        &self,
        region: &str,
        transit_gateway_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter(
            "describe_transit_gateway_route_tables",
            Some(transit_gateway_id),
            region,
        )?;
        self.page(
            Self::nested(&self.data.transit_gateway_route_tables, transit_gateway_id),
            next_token,
        )
    }

    async fn vpc_endpoints(
        &self,
        region: &str,
        endpoint_type: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_vpc_endpoints", Some(endpoint_type), region)?;
        let ids: Vec<String> = self
            .data
            .vpc_endpoints
            .iter()
            .filter(|endpoint| endpoint.endpoint_type.eq_ignore_ascii_case(endpoint_type))
            .map(|endpoint| endpoint.id.clone())
            .collect();
        self.page(&ids, next_token)
    }

    async fn egress_only_internet_gateways(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("describe_egress_only_internet_gateways", None, region)?;
        self.page(&self.data.egress_only_internet_gateways, next_token)
    }

    async fn buckets(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("list_buckets", None, region)?;
        self.page(&self.data.buckets, next_token)
    }

    async fn roles(&self, region: &str, next_token: Option<String>) -> ProviderResult<Page<Role>> {
        self.enter("list_roles", None, region)?;
        self.page(&self.data.roles, next_token)
    }

    async fn attached_role_policies(
        &self,
        region: &str,
        role_name: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("list_attached_role_policies", Some(role_name), region)?;
        self.page(
            Self::nested(&self.data.attached_role_policies, role_name),
            next_token,
        )
    }

    async fn server_certificates(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<String>> {
        self.enter("list_server_certificates", None, region)?;
        self.page(&self.data.server_certificates, next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::paginate;
    use futures::TryStreamExt;

    fn provider() -> FixtureProvider {
        FixtureProvider::from_json(
            br#"{
                "quotas": [
                    {"service_code": "vpc", "quota_code": "L-407747CB", "value": 200},
                    {"service_code": "vpc", "quota_code": "L-DFA99DE7", "default_value": 2}
                ],
                "vpcs": ["vpc-1", "vpc-2", "vpc-3", "vpc-4", "vpc-5"],
                "subnets": {"vpc-1": ["subnet-a", "subnet-b"]},
                "vpc_endpoints": [
                    {"id": "vpce-1", "endpoint_type": "Gateway"},
                    {"id": "vpce-2", "endpoint_type": "Interface"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn quota_values_come_from_fixture() {
        let provider = provider();
        assert_eq!(
            provider
                .service_quota("us-east-1", "vpc", "L-407747CB")
                .await
                .unwrap(),
            Decimal::from(200)
        );
        assert!(matches!(
            provider.service_quota("us-east-1", "vpc", "L-DFA99DE7").await,
            Err(ProviderError::QuotaNotFound { .. })
        ));
        assert_eq!(
            provider
                .default_service_quota("us-east-1", "vpc", "L-DFA99DE7")
                .await
                .unwrap(),
            Decimal::from(2)
        );
    }

    #[tokio::test]
    async fn page_size_splits_listings() {
        let provider = provider().with_page_size(2);

        let first = provider.vpcs("us-east-1", None).await.unwrap();
        assert_eq!(first.items, vec!["vpc-1", "vpc-2"]);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let all: Vec<String> = paginate(|token| provider.vpcs("us-east-1", token))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[4], "vpc-5");
    }

    #[tokio::test]
    async fn failures_are_injected_by_operation_and_resource() {
        let provider = provider().with_failure("describe_subnets:vpc-2");

        assert_eq!(
            provider
                .subnets("us-east-1", "vpc-1", None)
                .await
                .unwrap()
                .items
                .len(),
            2
        );
        assert!(provider.subnets("us-east-1", "vpc-2", None).await.is_err());

        let provider = self::provider().with_failure("describe_vpcs");
        assert!(provider.vpcs("eu-west-1", None).await.is_err());
    }

    #[tokio::test]
    async fn filters_and_call_log() {
        let provider = provider();
        let gateways = provider
            .vpc_endpoints("eu-west-1", "Gateway", None)
            .await
            .unwrap();
        assert_eq!(gateways.items, vec!["vpce-1"]);

        assert_eq!(
            provider.calls(),
            vec!["describe_vpc_endpoints:Gateway@eu-west-1".to_string()]
        );
    }
}
