//! Quota list loading

use anyhow::Context;
use aws_config::BehaviorVersion;
use quota_guard_core::{parse_descriptors, QuotaDescriptor, QuotaListSource};

/// Read and validate the quota list from a local file or an S3 object.
pub async fn load_quota_list(
    source: &QuotaListSource,
    region: &str,
) -> anyhow::Result<Vec<QuotaDescriptor>> {
    let bytes = match source {
        QuotaListSource::File(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read quota list {}", path.display()))?,
        QuotaListSource::S3 { bucket, key } => fetch_object(bucket, key, region).await?,
    };

    let descriptors = parse_descriptors(&bytes).context("Invalid quota list")?;
    tracing::info!(count = descriptors.len(), "Loaded quota list");
    for descriptor in &descriptors {
        tracing::debug!(
            service_code = %descriptor.service_code,
            quota_code = %descriptor.quota_code,
            threshold = %descriptor.threshold,
            applied_at_level = ?descriptor.applied_at_level,
            "Quota list entry"
        );
    }

    Ok(descriptors)
}

async fn fetch_object(bucket: &str, key: &str, region: &str) -> anyhow::Result<Vec<u8>> {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    let client = aws_sdk_s3::Client::new(&sdk_config);

    let object = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to fetch s3://{}/{}: {}",
                bucket,
                key,
                aws_sdk_s3::error::DisplayErrorContext(&e)
            )
        })?;

    let body = object
        .body
        .collect()
        .await
        .with_context(|| format!("Failed to read s3://{}/{}", bucket, key))?;

    Ok(body.into_bytes().to_vec())
}
