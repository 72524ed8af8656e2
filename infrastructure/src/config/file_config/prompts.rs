//! Prompt template configuration from TOML (`[prompts]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Template file overrides. Unset paths use the built-in templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    /// System prompt template; must use `{tutor_name}`
    pub system_template: Option<PathBuf>,
    /// Follow-up prompt template; must use `{query}` and `{response}`
    pub follow_up_template: Option<PathBuf>,
}
