use super::{api_error, count, next_token};
use crate::error::ProviderResult;
use crate::types::{ClassicLoadBalancer, LoadBalancer, Page};

pub(super) async fn classic_load_balancers(
    client: &aws_sdk_elasticloadbalancing::Client,
    token: Option<String>,
) -> ProviderResult<Page<ClassicLoadBalancer>> {
    let output = client
        .describe_load_balancers()
        .set_marker(token)
        .send()
        .await
        .map_err(api_error("describe_classic_load_balancers"))?;

    let items = output
        .load_balancer_descriptions()
        .iter()
        .filter_map(|description| {
            Some(ClassicLoadBalancer {
                name: description.load_balancer_name()?.to_string(),
                instance_count: count(description.instances().len()),
            })
        })
        .collect();
    Ok(Page::new(items, next_token(output.next_marker())))
}

pub(super) async fn load_balancers(
    client: &aws_sdk_elasticloadbalancingv2::Client,
    token: Option<String>,
) -> ProviderResult<Page<LoadBalancer>> {
    let output = client
        .describe_load_balancers()
        .set_marker(token)
        .send()
        .await
        .map_err(api_error("describe_load_balancers"))?;

    let items = output
        .load_balancers()
        .iter()
        .filter_map(|balancer| {
            let arn = balancer.load_balancer_arn()?.to_string();
            Some(LoadBalancer {
                name: balancer
                    .load_balancer_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| arn.clone()),
                arn,
            })
        })
        .collect();
    Ok(Page::new(items, next_token(output.next_marker())))
}

pub(super) async fn target_groups(
    client: &aws_sdk_elasticloadbalancingv2::Client,
    load_balancer_arn: &str,
    token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .describe_target_groups()
        .load_balancer_arn(load_balancer_arn)
        .set_marker(token)
        .send()
        .await
        .map_err(api_error("describe_target_groups"))?;

    let items = output
        .target_groups()
        .iter()
        .filter_map(|group| group.target_group_arn())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.next_marker())))
}

pub(super) async fn target_health(
    client: &aws_sdk_elasticloadbalancingv2::Client,
    target_group_arn: &str,
) -> ProviderResult<Vec<String>> {
    let output = client
        .describe_target_health()
        .target_group_arn(target_group_arn)
        .send()
        .await
        .map_err(api_error("describe_target_health"))?;

    Ok(output
        .target_health_descriptions()
        .iter()
        .filter_map(|description| description.target())
        .map(|target| target.id())
        .map(str::to_string)
        .collect())
}
