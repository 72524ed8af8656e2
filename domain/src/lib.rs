//! Domain layer for tutor-relay
//!
//! This crate contains the chat entities, protocol events and prompt
//! templates. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! - **Turn**: one user message and the streamed answer to it, closed by a
//!   single terminal event.
//! - **Fragment**: one incremental piece of model text.
//! - **Structured completion**: a model call constrained to the
//!   [`StructuredOutput`] schema, used for follow-up suggestions.

pub mod chat;
pub mod core;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use chat::{
    ChatEvent, ChatTurnRequest, ConversationContext, FollowUpFilter, StreamedChatResponse,
    StructuredOutput, augment_message, follow_up::FilteredFollowUps,
};
pub use core::error::DomainError;
pub use prompt::{PromptTemplate, PromptTemplates};
pub use session::{
    entities::{Message, Role},
    stream::StreamEvent,
};
