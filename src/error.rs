//! Error types for bundle encoding and configuration

use thiserror::Error;

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, BundleError>;

/// Errors raised outside the (total) transform and validate passes
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Configuration encoding error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
}
