use thiserror::Error;

/// Provider operation errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{operation} failed: {message}")]
    Api { operation: String, message: String },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Quota {quota_code} of service {service_code} not found")]
    QuotaNotFound {
        service_code: String,
        quota_code: String,
    },

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
