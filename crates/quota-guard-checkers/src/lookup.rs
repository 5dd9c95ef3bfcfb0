//! Quota limit lookup with default fallback

use std::sync::Arc;

use quota_guard_provider::CloudProvider;
use rust_decimal::Decimal;

use crate::error::{CheckError, CheckResult};

/// Resolves the numeric limit of a quota in a region.
///
/// The applied limit is tried first; if that call fails for any reason the
/// provider default is used instead.
#[derive(Debug, Clone)]
pub struct QuotaLookup {
    provider: Arc<dyn CloudProvider>,
}

impl QuotaLookup {
    pub fn new(provider: Arc<dyn CloudProvider>) -> Self {
        Self { provider }
    }

    pub async fn limit(
        &self,
        region: &str,
        service_code: &str,
        quota_code: &str,
    ) -> CheckResult<Decimal> {
        let limit = match self
            .provider
            .service_quota(region, service_code, quota_code)
            .await
        {
            Ok(limit) => limit,
            Err(e) => {
                tracing::info!(
                    error = %e,
                    service_code = %service_code,
                    quota_code = %quota_code,
                    region = %region,
                    "Applied quota unavailable, using default"
                );
                self.provider
                    .default_service_quota(region, service_code, quota_code)
                    .await
                    .map_err(|source| CheckError::LimitUnavailable {
                        service_code: service_code.to_string(),
                        quota_code: quota_code.to_string(),
                        source,
                    })?
            }
        };

        if limit <= Decimal::ZERO {
            return Err(CheckError::InvalidLimit {
                quota_code: quota_code.to_string(),
                limit,
            });
        }

        Ok(limit)
    }
}
