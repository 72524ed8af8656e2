//! Resolved connection settings for the Azure OpenAI adapter.

use crate::config::{ConfigError, FileProviderConfig};
use std::fmt;

/// Deployment and sampling settings for one kind of call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    pub deployment: String,
    pub temperature: f32,
}

/// Fully resolved provider settings. Built from [`FileProviderConfig`]
/// after validation.
#[derive(Clone, PartialEq)]
pub struct AzureOpenAiSettings {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    /// Profile for the streamed chat answer
    pub chat: ModelProfile,
    /// Profile for the structured follow-up call
    pub structured: ModelProfile,
    /// Request incremental delivery for the chat answer
    pub streaming: bool,
}

impl AzureOpenAiSettings {
    pub fn from_file(config: &FileProviderConfig) -> Result<Self, ConfigError> {
        fn required(
            value: Option<&str>,
            field: &'static str,
            env: &'static str,
        ) -> Result<String, ConfigError> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(ConfigError::MissingProviderField { field, env })
        }

        Ok(Self {
            endpoint: required(
                config.endpoint.as_deref(),
                "endpoint",
                "AZURE_OPENAI_ENDPOINT",
            )?,
            api_key: required(config.api_key.as_deref(), "api_key", "AZURE_OPENAI_API_KEY")?,
            api_version: required(
                config.api_version.as_deref(),
                "api_version",
                "AZURE_OPENAI_API_VERSION",
            )?,
            chat: ModelProfile {
                deployment: required(
                    config.chat_deployment(),
                    "deployment",
                    "AZURE_OPENAI_DEPLOYMENT_NAME",
                )?,
                temperature: config.chat.temperature,
            },
            structured: ModelProfile {
                deployment: required(
                    config.structured_deployment(),
                    "deployment",
                    "AZURE_OPENAI_DEPLOYMENT_NAME",
                )?,
                temperature: config.structured.temperature,
            },
            streaming: config.chat.streaming,
        })
    }

    /// Chat Completions URL for a deployment.
    pub fn completions_url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            deployment,
            self.api_version
        )
    }
}

impl fmt::Debug for AzureOpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("chat", &self.chat)
            .field("structured", &self.structured)
            .field("streaming", &self.streaming)
            .finish()
    }
}
