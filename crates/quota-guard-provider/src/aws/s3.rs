use aws_sdk_s3::Client;

use super::{api_error, next_token};
use crate::error::ProviderResult;
use crate::types::Page;

/// Buckets requested per `ListBuckets` page
const MAX_BUCKETS: i32 = 1000;

/// Bucket names, one page per call.
pub(super) async fn buckets(
    client: &Client,
    continuation_token: Option<String>,
) -> ProviderResult<Page<String>> {
    let output = client
        .list_buckets()
        .max_buckets(MAX_BUCKETS)
        .set_continuation_token(continuation_token)
        .send()
        .await
        .map_err(api_error("list_buckets"))?;

    let items = output
        .buckets()
        .iter()
        .filter_map(|bucket| bucket.name())
        .map(str::to_string)
        .collect();
    Ok(Page::new(items, next_token(output.continuation_token())))
}
