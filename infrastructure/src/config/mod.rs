//! Configuration loading for tutor-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TUTOR_RELAY_*` environment variables
//! 2. `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_API_VERSION`,
//!    `AZURE_OPENAI_DEPLOYMENT_NAME`
//! 3. `--config <path>` specified file
//! 4. Project root: `./tutor-relay.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/tutor-relay/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, DEFAULT_BIND, FileBehaviorConfig, FileChatProfile, FileConfig,
    FileLoggingConfig, FilePromptsConfig, FileProviderConfig, FileServerConfig,
    FileStructuredProfile,
};
pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
