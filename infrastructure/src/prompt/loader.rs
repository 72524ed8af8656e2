//! Local file system template loader

use crate::config::FilePromptsConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use tutor_relay_domain::{DomainError, PromptTemplates};

/// Errors raised while loading configured templates. Fatal at startup.
#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid template {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

/// Loads [`PromptTemplates`] according to the `[prompts]` section.
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn load(config: &FilePromptsConfig) -> Result<PromptTemplates, TemplateLoadError> {
        let system = Self::read_or_default(
            config.system_template.as_deref(),
            PromptTemplates::default_system_text(),
        )?;
        let follow_up = Self::read_or_default(
            config.follow_up_template.as_deref(),
            PromptTemplates::default_follow_up_text(),
        )?;

        PromptTemplates::from_texts(&system, &follow_up).map_err(|source| {
            // Attribute the failure to whichever file was overridden.
            let path = match &source {
                DomainError::UnknownTemplateVariable { template, .. }
                | DomainError::MissingTemplateVariable { template, .. }
                    if template == "system" =>
                {
                    config.system_template.clone()
                }
                _ => config.follow_up_template.clone(),
            };
            TemplateLoadError::Invalid {
                path: path.unwrap_or_else(|| PathBuf::from("<built-in>")),
                source,
            }
        })
    }

    fn read_or_default(path: Option<&Path>, default: &str) -> Result<String, TemplateLoadError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| TemplateLoadError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!("Loaded prompt template from {}", path.display());
                Ok(text)
            }
            None => {
                debug!("Using built-in prompt template");
                Ok(default.to_string())
            }
        }
    }
}
