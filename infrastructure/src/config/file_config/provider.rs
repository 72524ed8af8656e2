//! Provider configuration from TOML (`[provider]` section)
//!
//! Connection settings for the hosted Azure OpenAI deployment plus the two
//! model profiles a chat turn uses: the streamed chat answer and the
//! structured follow-up call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat profile (`[provider.chat]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatProfile {
    /// Sampling temperature (default: 0.7)
    pub temperature: f32,
    /// Request an incremental stream (default: true). When false the whole
    /// answer arrives at once.
    pub streaming: bool,
    /// Deployment override for the chat call
    pub deployment: Option<String>,
}

impl Default for FileChatProfile {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            streaming: true,
            deployment: None,
        }
    }
}

/// Structured-output profile (`[provider.structured]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStructuredProfile {
    /// Sampling temperature (default: 0.2)
    pub temperature: f32,
    /// Deployment override for the follow-up call
    pub deployment: Option<String>,
}

impl Default for FileStructuredProfile {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            deployment: None,
        }
    }
}

/// Raw provider configuration from TOML.
///
/// Every connection field is optional at the file level so that it can be
/// supplied by the environment instead (`AZURE_OPENAI_*`).
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: Option<String>,
    /// API key sent in the `api-key` header
    pub api_key: Option<String>,
    /// Value of the `api-version` query parameter
    pub api_version: Option<String>,
    /// Default deployment name
    pub deployment: Option<String>,
    pub chat: FileChatProfile,
    pub structured: FileStructuredProfile,
}

impl FileProviderConfig {
    /// Deployment used for the chat call.
    pub fn chat_deployment(&self) -> Option<&str> {
        self.chat
            .deployment
            .as_deref()
            .or(self.deployment.as_deref())
    }

    /// Deployment used for the structured follow-up call.
    pub fn structured_deployment(&self) -> Option<&str> {
        self.structured
            .deployment
            .as_deref()
            .or(self.deployment.as_deref())
    }
}

impl fmt::Debug for FileProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .field("chat", &self.chat)
            .field("structured", &self.structured)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deployment_falls_back_to_default() {
        let config = FileProviderConfig {
            deployment: Some("gpt-4o".to_string()),
            structured: FileStructuredProfile {
                deployment: Some("gpt-4o-mini".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.chat_deployment(), Some("gpt-4o"));
        assert_eq!(config.structured_deployment(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = FileProviderConfig {
            api_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
