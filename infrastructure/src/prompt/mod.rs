//! Prompt template loading
//!
//! Reads template overrides from disk, falling back to the built-in texts
//! for any path that is not configured.

mod loader;

pub use loader::{TemplateLoadError, TemplateLoader};
