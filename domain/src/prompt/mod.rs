//! Prompt domain
//!
//! Templates for the system prompt and the follow-up generation prompt.

mod template;

pub use template::{PromptTemplate, PromptTemplates, VAR_QUERY, VAR_RESPONSE, VAR_TUTOR_NAME};
