use aws_sdk_servicequotas::Client;
use rust_decimal::Decimal;

use super::api_error;
use crate::error::{ProviderError, ProviderResult};

pub(super) async fn applied(
    client: &Client,
    service_code: &str,
    quota_code: &str,
) -> ProviderResult<Decimal> {
    let output = client
        .get_service_quota()
        .service_code(service_code)
        .quota_code(quota_code)
        .send()
        .await
        .map_err(api_error("get_service_quota"))?;

    limit_value(
        "get_service_quota",
        output.quota().and_then(|quota| quota.value()),
    )
}

pub(super) async fn default(
    client: &Client,
    service_code: &str,
    quota_code: &str,
) -> ProviderResult<Decimal> {
    let output = client
        .get_aws_default_service_quota()
        .service_code(service_code)
        .quota_code(quota_code)
        .send()
        .await
        .map_err(api_error("get_aws_default_service_quota"))?;

    limit_value(
        "get_aws_default_service_quota",
        output.quota().and_then(|quota| quota.value()),
    )
}

fn limit_value(operation: &'static str, value: Option<f64>) -> ProviderResult<Decimal> {
    let value = value.ok_or(ProviderError::MissingField {
        operation,
        field: "Quota.Value",
    })?;

    Decimal::try_from(value)
        .map(|limit| limit.normalize())
        .map_err(|err| ProviderError::api(operation, format!("limit {value} is not a decimal: {err}")))
}
