use quota_guard_provider::ProviderError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Checker routine errors
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Limit for {service_code}/{quota_code} unavailable: {source}")]
    LimitUnavailable {
        service_code: String,
        quota_code: String,
        #[source]
        source: ProviderError,
    },

    #[error("Limit for {quota_code} must be positive, got {limit}")]
    InvalidLimit { quota_code: String, limit: Decimal },

    #[error("Enumeration failed: {0}")]
    Enumeration(#[from] ProviderError),

    #[error("Checker panicked: {0}")]
    Panicked(String),
}

/// Result type for checker routines
pub type CheckResult<T> = Result<T, CheckError>;
