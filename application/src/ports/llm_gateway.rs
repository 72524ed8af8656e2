//! LLM Gateway port
//!
//! Defines the interface for communicating with the hosted model provider.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tutor_relay_domain::{Message, StreamEvent, StructuredOutput};

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Provider output did not match schema: {0}")]
    SchemaMismatch(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// Two capabilities are required by a chat turn: a streamed free-text
/// completion and a structured completion constrained to
/// [`StructuredOutput::json_schema`]. Implementations (adapters) live in the
/// infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Submit a prompt and receive the reply incrementally.
    ///
    /// Errors returned here mean the stream could not be opened. Failures
    /// after that arrive as [`StreamEvent::Error`].
    async fn stream_complete(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError>;

    /// Submit a prompt and receive an object validated against the
    /// structured-output schema.
    ///
    /// A reply that does not match the schema is
    /// [`GatewayError::SchemaMismatch`], never a partial object.
    async fn structured_complete(&self, prompt: &str) -> Result<StructuredOutput, GatewayError>;
}

/// Handle for receiving streaming events from a completion.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. Dropping the handle abandons the
/// completion; adapters stop forwarding once their send fails.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Receive the next event, or `None` once the producer is gone.
    pub async fn next(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }
}
