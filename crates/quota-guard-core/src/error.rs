//! Error types for loading the quota descriptor list

/// Errors raised while parsing or validating the quota descriptor list.
///
/// Any of these is a configuration error: the run is aborted before a single
/// check executes.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Malformed quota list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Descriptor #{index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("Descriptor #{index} ({quota_code}) has a negative threshold: {threshold}")]
    NegativeThreshold {
        index: usize,
        quota_code: String,
        threshold: rust_decimal::Decimal,
    },
}

/// Result type for descriptor parsing
pub type DescriptorResult<T> = Result<T, DescriptorError>;
