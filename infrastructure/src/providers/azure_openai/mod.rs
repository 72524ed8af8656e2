//! Azure OpenAI provider
//!
//! Implements the [`LlmGateway`](tutor_relay_application::LlmGateway) port
//! against the Chat Completions API of an Azure OpenAI resource:
//!
//! - streamed answers are read from the SSE body and forwarded as
//!   [`StreamEvent::Delta`](tutor_relay_domain::StreamEvent) fragments
//! - follow-up suggestions use `response_format: json_schema` with strict
//!   schema enforcement and are parsed into
//!   [`StructuredOutput`](tutor_relay_domain::StructuredOutput)

mod error;
mod gateway;
mod settings;
mod sse;
mod types;

pub use error::AzureOpenAiError;
pub use gateway::AzureOpenAiGateway;
pub use settings::{AzureOpenAiSettings, ModelProfile};
