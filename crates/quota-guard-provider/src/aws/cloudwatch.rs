use std::time::{Duration, SystemTime};

use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, Statistic};
use aws_sdk_cloudwatch::Client;

use super::api_error;
use crate::error::{ProviderError, ProviderResult};
use crate::types::MetricDatapoint;

const OPERATION: &str = "get_metric_statistics";

fn vpc_dimension(vpc_id: &str) -> ProviderResult<Dimension> {
    Dimension::builder()
        .name("Per-VPC Metrics")
        .value(vpc_id)
        .build()
        .map_err(|err| ProviderError::api(OPERATION, err.to_string()))
}

/// `NetworkAddressUsage` maxima for one VPC over the trailing window.
pub(super) async fn network_address_usage(
    client: &Client,
    vpc_id: &str,
    window: Duration,
) -> ProviderResult<Vec<MetricDatapoint>> {
    let end = SystemTime::now();
    let start = end.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);
    // Period must be a multiple of 60 seconds
    let period = i32::try_from((window.as_secs() / 60).max(1) * 60).unwrap_or(i32::MAX);

    let output = client
        .get_metric_statistics()
        .namespace("AWS/EC2")
        .metric_name("NetworkAddressUsage")
        .dimensions(vpc_dimension(vpc_id)?)
        .start_time(DateTime::from(start))
        .end_time(DateTime::from(end))
        .period(period)
        .statistics(Statistic::Maximum)
        .send()
        .await
        .map_err(api_error(OPERATION))?;

    output
        .datapoints()
        .iter()
        .filter_map(|point| Some((point.timestamp()?, point.maximum()?)))
        .map(|(timestamp, maximum)| {
            let timestamp = chrono::DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
                .ok_or(ProviderError::MissingField {
                    operation: OPERATION,
                    field: "Datapoints.Timestamp",
                })?;
            Ok(MetricDatapoint { timestamp, maximum })
        })
        .collect()
}
