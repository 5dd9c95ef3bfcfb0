use aws_sdk_iam::Client;

use super::{api_error, next_token};
use crate::error::ProviderResult;
use crate::types::{Page, Role};

pub(super) async fn roles(client: &Client, marker: Option<String>) -> ProviderResult<Page<Role>> {
    let output = client
        .list_roles()
        .set_marker(marker)
        .send()
        .await
        .map_err(api_error("list_roles"))?;

    let items = output
        .roles()
        .iter()
        .map(|role| Role {
            name: role.role_name().to_string(),
            arn: role.arn().to_string(),
        })
        .collect();
    Ok(Page::new(items, next_token(output.marker())))
}

pub(super) async fn attached_role_policies(
    client: &Client,
    role_name: &str,
    marker: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .list_attached_role_policies()
        .role_name(role_name)
        .set_marker(marker)
        .send()
        .await
        .map_err(api_error("list_attached_role_policies"))?;

    let items = output
        .attached_policies()
        .iter()
        .filter_map(|policy| policy.policy_arn())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.marker())))
}

pub(super) async fn server_certificates(
    client: &Client,
    marker: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .list_server_certificates()
        .set_marker(marker)
        .send()
        .await
        .map_err(api_error("list_server_certificates"))?;

    let items = output
        .server_certificate_metadata_list()
        .iter()
        .map(|metadata| metadata.server_certificate_name())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.marker())))
}
