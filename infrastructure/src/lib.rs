//! Infrastructure layer for tutor-relay
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the Azure OpenAI gateway, the in-memory conversation
//! store, the JSONL transcript logger, plus configuration and prompt
//! template loading.

pub mod config;
pub mod logging;
pub mod memory;
pub mod prompt;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use memory::InMemoryConversationStore;
pub use prompt::{TemplateLoadError, TemplateLoader};
pub use providers::{AzureOpenAiError, AzureOpenAiGateway, AzureOpenAiSettings};
