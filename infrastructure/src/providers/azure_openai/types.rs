//! Chat Completions wire types (the subset this adapter uses)

use super::error::AzureOpenAiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tutor_relay_domain::{Message, Role};

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::Human => "user",
            Role::Ai => "assistant",
        };
        Self {
            role,
            content: &message.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSchemaFormat {
    pub name: &'static str,
    pub strict: bool,
    pub schema: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: JsonSchemaFormat,
}

impl ResponseFormat {
    pub fn strict_schema(name: &'static str, schema: Value) -> Self {
        Self {
            kind: "json_schema",
            json_schema: JsonSchemaFormat {
                name,
                strict: true,
                schema,
            },
        }
    }
}

/// Request body for `POST .../chat/completions`.
///
/// The deployment in the URL selects the model, so no `model` field is sent.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderErrorBody {
    #[serde(default)]
    pub message: String,
}

/// One `data:` payload of a streamed completion.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    pub error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChunkDelta {
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice. Azure sends choice-less chunks for
    /// content filter results; those yield `None`.
    pub fn into_delta(self) -> Result<Option<String>, AzureOpenAiError> {
        if let Some(error) = self.error {
            return Err(AzureOpenAiError::Upstream(error.message));
        }
        Ok(self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content))
    }
}

/// Non-streamed completion response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

impl ChatCompletion {
    /// Text of the first choice.
    pub fn into_text(self) -> Result<String, AzureOpenAiError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or(AzureOpenAiError::EmptyResponse)?;
        if let Some(refusal) = choice.message.refusal {
            return Err(AzureOpenAiError::Refusal(refusal));
        }
        Ok(choice.message.content.unwrap_or_default())
    }
}
