//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has defaults, so an empty file (or no file) is a valid
//! starting point; the provider connection settings must then come from
//! the environment.

mod behavior;
mod logging;
mod prompts;
mod provider;
mod server;

pub use behavior::FileBehaviorConfig;
pub use logging::FileLoggingConfig;
pub use prompts::FilePromptsConfig;
pub use provider::{FileChatProfile, FileProviderConfig, FileStructuredProfile};
pub use server::{DEFAULT_BIND, FileServerConfig};

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

/// Allowed sampling temperature range.
const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Configuration errors, reported before the server starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("provider.{field} is required (set it in a config file or via {env})")]
    MissingProviderField {
        field: &'static str,
        env: &'static str,
    },

    #[error("provider.{profile}.temperature must be between 0.0 and 2.0, got {value}")]
    InvalidTemperature { profile: &'static str, value: f32 },

    #[error("server.bind is not a socket address: {0}")]
    InvalidBind(String),

    #[error("behavior.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("behavior.max_turns cannot be 0")]
    InvalidMaxTurns,

    #[error("behavior.channel_capacity cannot be 0")]
    InvalidChannelCapacity,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener settings
    pub server: FileServerConfig,
    /// Hosted model provider settings
    pub provider: FileProviderConfig,
    /// Turn behavior settings
    pub behavior: FileBehaviorConfig,
    /// Prompt template overrides
    pub prompts: FilePromptsConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let provider = &self.provider;
        let required = [
            ("endpoint", "AZURE_OPENAI_ENDPOINT", provider.endpoint.as_deref()),
            ("api_key", "AZURE_OPENAI_API_KEY", provider.api_key.as_deref()),
            ("api_version", "AZURE_OPENAI_API_VERSION", provider.api_version.as_deref()),
            ("deployment", "AZURE_OPENAI_DEPLOYMENT_NAME", provider.chat_deployment()),
        ];
        for (field, env, value) in required {
            if value.is_none_or(|v| v.trim().is_empty()) {
                return Err(ConfigError::MissingProviderField { field, env });
            }
        }

        if provider.structured_deployment().is_none() {
            return Err(ConfigError::MissingProviderField {
                field: "deployment",
                env: "AZURE_OPENAI_DEPLOYMENT_NAME",
            });
        }

        for (profile, value) in [
            ("chat", provider.chat.temperature),
            ("structured", provider.structured.temperature),
        ] {
            if !TEMPERATURE_RANGE.contains(&value) {
                return Err(ConfigError::InvalidTemperature { profile, value });
            }
        }

        self.bind_addr()?;

        if let Some(0) = self.behavior.timeout_seconds {
            return Err(ConfigError::InvalidTimeout);
        }
        if let Some(0) = self.behavior.max_turns {
            return Err(ConfigError::InvalidMaxTurns);
        }
        if self.behavior.channel_capacity == 0 {
            return Err(ConfigError::InvalidChannelCapacity);
        }

        Ok(())
    }

    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.server.bind.clone()))
    }
}
