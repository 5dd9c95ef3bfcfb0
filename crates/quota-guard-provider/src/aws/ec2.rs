use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client;

use super::{api_error, count, next_token};
use crate::error::ProviderResult;
use crate::types::{ClientVpnConnection, NatGateway, Page, PeeringRole, Volume};

fn filter(name: &str, value: &str) -> Filter {
    Filter::builder().name(name).values(value).build()
}

pub(super) async fn vpcs(client: &Client, token: Option<String>) -> ProviderResult<Page<String>> {
    let output = client
        .describe_vpcs()
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_vpcs"))?;

    let items = output
        .vpcs()
        .iter()
        .filter_map(|vpc| vpc.vpc_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn nat_gateways(
    client: &Client,
    token: Option<String>,
) -> ProviderResult<Page<NatGateway>> {
    let output = client
        .describe_nat_gateways()
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_nat_gateways"))?;

    let items = output
        .nat_gateways()
        .iter()
        .filter_map(|gateway| {
            Some(NatGateway {
                id: gateway.nat_gateway_id()?.to_string(),
                address_count: count(gateway.nat_gateway_addresses().len()),
            })
        })
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn client_vpn_endpoints(
    client: &Client,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_client_vpn_endpoints()
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_client_vpn_endpoints"))?;

    let items = output
        .client_vpn_endpoints()
        .iter()
        .filter_map(|endpoint| endpoint.client_vpn_endpoint_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn client_vpn_connections(
    client: &Client,
    endpoint_id: &str,
    token: Option<String>,
) -> ProviderResult<Page<ClientVpnConnection>> {
    let output = client
        .describe_client_vpn_connections()
        .client_vpn_endpoint_id(endpoint_id)
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_client_vpn_connections"))?;

    let items = output
        .connections()
        .iter()
        .filter_map(|connection| {
            let status = connection
                .status()
                .and_then(|status| status.code())
                .map(|code| code.as_str().to_string())
                .unwrap_or_default();
            Some(ClientVpnConnection {
                id: connection.connection_id()?.to_string(),
                status,
            })
        })
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn vpc_peering_connections(
    client: &Client,
    vpc_id: &str,
    role: PeeringRole,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_vpc_peering_connections()
        .filters(filter(role.filter_name(), vpc_id))
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_vpc_peering_connections"))?;

    let items = output
        .vpc_peering_connections()
        .iter()
        .filter_map(|peering| peering.vpc_peering_connection_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn subnets(
    client: &Client,
    vpc_id: &str,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_subnets()
        .filters(filter("vpc-id", vpc_id))
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_subnets"))?;

    let items = output
        .subnets()
        .iter()
        .filter_map(|subnet| subnet.subnet_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn network_interfaces(
    client: &Client,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_network_interfaces()
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_network_interfaces"))?;

    let items = output
        .network_interfaces()
        .iter()
        .filter_map(|interface| interface.network_interface_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn volumes(
    client: &Client,
    volume_type: &str,
    token: Option<String>,
) -> ProviderResult<Page<Volume>> {
    let output = client
        .describe_volumes()
        .filters(filter("volume-type", volume_type))
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_volumes"))?;

    let items = output
        .volumes()
        .iter()
        .filter_map(|volume| {
            Some(Volume {
                id: volume.volume_id()?.to_string(),
                size_gib: volume.size().and_then(|size| u64::try_from(size).ok()).unwrap_or(0),
                volume_type: volume
                    .volume_type()
                    .map(|kind| kind.as_str().to_string())
                    .unwrap_or_else(|| volume_type.to_string()),
            })
        })
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn transit_gateways(
    client: &Client,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_transit_gateways()
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_transit_gateways"))?;

    let items = output
        .transit_gateways()
        .iter()
        .filter_map(|gateway| gateway.transit_gateway_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn transit_gateway_route_tables(
    client: &Client,
    transit_gateway_id: &str,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_transit_gateway_route_tables()
        .filters(filter("transit-gateway-id", transit_gateway_id))
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_transit_gateway_route_tables"))?;

    let items = output
        .transit_gateway_route_tables()
        .iter()
        .filter_map(|table| table.transit_gateway_route_table_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn vpc_endpoints(
    client: &Client,
    endpoint_type: &str,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_vpc_endpoints()
        .filters(filter("vpc-endpoint-type", endpoint_type))
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_vpc_endpoints"))?;

    let items = output
        .vpc_endpoints()
        .iter()
        .filter_map(|endpoint| endpoint.vpc_endpoint_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}

pub(super) async fn egress_only_internet_gateways(
    client: &Client,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_egress_only_internet_gateways()
        .set_next_token(token)
        .send()
        .await
        .map_err(api_error("describe_egress_only_internet_gateways"))?;

    let items = output
        .egress_only_internet_gateways()
        .iter()
        .filter_map(|gateway| gateway.egress_only_internet_gateway_id())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_token())))
}
