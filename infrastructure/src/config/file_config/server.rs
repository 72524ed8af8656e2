//! Server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Raw HTTP server configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Origins allowed by CORS. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            allowed_origins: Vec::new(),
        }
    }
}
