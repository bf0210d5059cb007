//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid analysis service URL (must be http:// or https://)")]
    InvalidServiceUrl,

    #[error("Invalid request timeout (must be 1..=600 seconds)")]
    InvalidTimeout,

    #[error("Too many retries configured (maximum is 5)")]
    TooManyRetries,

    #[error("Canned chat mode requires at least one canned response")]
    NoCannedResponses,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
