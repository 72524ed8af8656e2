//! Configuration file loader with multi-source merging

use super::file_config::{ConfigError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "tutor-relay.toml";

/// Prefix of environment overrides, e.g. `TUTOR_RELAY_BEHAVIOR__MAX_TURNS`.
pub const ENV_PREFIX: &str = "TUTOR_RELAY_";

/// Standard Azure OpenAI variables and the config keys they populate.
const AZURE_ENV_KEYS: [(&str, &str); 4] = [
    ("AZURE_OPENAI_ENDPOINT", "provider.endpoint"),
    ("AZURE_OPENAI_API_KEY", "provider.api_key"),
    ("AZURE_OPENAI_API_VERSION", "provider.api_version"),
    ("AZURE_OPENAI_DEPLOYMENT_NAME", "provider.deployment"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TUTOR_RELAY_*` environment variables (`__` separates sections)
    /// 2. `AZURE_OPENAI_*` environment variables
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./tutor-relay.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/tutor-relay/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::extract(Self::figment(config_path))
    }

    /// Load defaults plus environment, skipping every config file (for --no-config)
    pub fn load_env_only() -> Result<FileConfig, ConfigError> {
        Self::extract(Self::with_env(Self::defaults()))
    }

    /// Build the layered figment without extracting it.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Self::defaults();

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/tutor-relay/config.toml if set,
    /// otherwise falls back to ~/.config/tutor-relay/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tutor-relay").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] {}* (sections separated by __)", ENV_PREFIX);
        for (var, key) in AZURE_ENV_KEYS {
            let marker = if std::env::var_os(var).is_some() {
                "SET  "
            } else {
                "     "
            };
            println!("  [{}] {} -> {}", marker, var, key);
        }

        if let Some(path) = config_path {
            let marker = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", marker, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./{}", PROJECT_CONFIG_FILE);
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(FileConfig::default()))
    }

    fn with_env(figment: Figment) -> Figment {
        let azure = Env::raw()
            .only(&AZURE_ENV_KEYS.map(|(var, _)| var))
            .map(|var| {
                AZURE_ENV_KEYS
                    .iter()
                    .find(|(name, _)| var.as_str().eq_ignore_ascii_case(name))
                    .map(|(_, key)| (*key).into())
                    .unwrap_or_else(|| var.as_str().into())
            });

        figment
            .merge(azure)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<FileConfig, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }
}
