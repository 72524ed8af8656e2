//! Streaming events for LLM completion.
//!
//! [`StreamEvent`] represents individual events in a streaming LLM response,
//! enabling real-time delivery of model output as it's generated.

/// An event in a streaming LLM response.
///
/// Used to bridge infrastructure-level streaming (SSE chunks from the
/// provider) to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}
