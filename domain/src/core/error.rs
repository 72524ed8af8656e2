//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A chat turn request failed validation (client input error).
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Template '{template}' references unknown variable '{variable}'")]
    UnknownTemplateVariable { template: String, variable: String },

    #[error("Template '{template}' is missing required variable '{variable}'")]
    MissingTemplateVariable { template: String, variable: String },
}
