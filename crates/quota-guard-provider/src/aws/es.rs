use aws_sdk_elasticsearch::Client;

use super::api_error;
use crate::error::ProviderResult;
use crate::types::{Page, SearchDomain};

/// Domains accepted by one `DescribeElasticsearchDomains` call
const DESCRIBE_BATCH: usize = 5;

/// All search domains with their instance counts.
///
/// Domain names are not paginated; details are fetched in batches.
pub(super) async fn search_domains(client: &Client) -> ProviderResult<Page<SearchDomain>> {
    let output = client
        .list_domain_names()
        .send()
        .await
        .map_err(api_error("list_domain_names"))?;

    let names: Vec<String> = output
        .domain_names()
        .iter()
        .filter_map(|info| info.domain_name())
        .map(str::to_string)
        .collect();

    let mut domains = Vec::with_capacity(names.len());
    for batch in names.chunks(DESCRIBE_BATCH) {
        let output = client
            .describe_elasticsearch_domains()
            .set_domain_names(Some(batch.to_vec()))
            .send()
            .await
            .map_err(api_error("describe_elasticsearch_domains"))?;

        for status in output.domain_status_list() {
            let id = status.domain_id();
            if id.is_empty() {
                continue;
            }
            let instance_count = status
                .elasticsearch_cluster_config()
                .and_then(|config| config.instance_count())
                .and_then(|count| u32::try_from(count).ok())
                .unwrap_or(0);

            domains.push(SearchDomain {
                id: id.to_string(),
                instance_count,
            });
        }
    }

    Ok(Page::last(domains))
}
