//! Error types for release extraction.

use thiserror::Error;

/// Failures raised by the extraction pipeline.
///
/// `MissingData` and `UnresolvableReference` are recovered inside the
/// pipeline (logged, then defaulted). The rest surface to the caller.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Malformed pattern: {0}")]
    MalformedPattern(#[from] regex::Error),

    #[error("Unresolvable reference: {0}")]
    UnresolvableReference(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
