//! Error types for the Azure OpenAI adapter

use thiserror::Error;
use tutor_relay_application::GatewayError;

/// Errors that can occur when talking to Azure OpenAI
#[derive(Error, Debug)]
pub enum AzureOpenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider reported an error: {0}")]
    Upstream(String),

    #[error("Malformed stream event: {0}")]
    MalformedEvent(String),

    #[error("Structured output did not match schema: {0}")]
    Schema(String),

    #[error("Model refused the request: {0}")]
    Refusal(String),

    #[error("Completion contained no choices")]
    EmptyResponse,
}

impl From<AzureOpenAiError> for GatewayError {
    fn from(err: AzureOpenAiError) -> Self {
        match err {
            AzureOpenAiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            AzureOpenAiError::Http(e) if e.is_connect() => {
                GatewayError::ConnectionError(e.to_string())
            }
            AzureOpenAiError::Schema(msg) => GatewayError::SchemaMismatch(msg),
            other => GatewayError::RequestFailed(other.to_string()),
        }
    }
}
