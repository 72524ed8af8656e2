//! LLM provider adapters

pub mod azure_openai;

pub use azure_openai::{AzureOpenAiError, AzureOpenAiGateway, AzureOpenAiSettings, ModelProfile};
