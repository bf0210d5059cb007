//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TLDR` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use tldr_analyzer::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Analysis service at {}", config.service.base_url);
//! ```

mod chat;
mod error;
mod logging;
mod report;
mod service;

pub use chat::{ChatConfig, ChatMode};
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use report::ReportConfig;
pub use service::ServiceConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// configuration pointed at a local analysis service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote analysis service (base URL, timeout, retries)
    #[serde(default)]
    pub service: ServiceConfig,

    /// Chat gateway (answer source, greeting, voice)
    #[serde(default)]
    pub chat: ChatConfig,

    /// Report export
    #[serde(default)]
    pub report: ReportConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TLDR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TLDR__SERVICE__BASE_URL=http://host:8000` -> `service.base_url`
    /// - `TLDR__CHAT__CANNED_RESPONSES=first|second` -> `chat.canned_responses`
    ///   (list items are separated by `|` so replies may contain commas)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TLDR")
                    .separator("__")
                    .list_separator("|")
                    .with_list_parse_key("chat.canned_responses")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service.validate()?;
        self.chat.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
