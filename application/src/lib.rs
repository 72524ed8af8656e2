//! Application layer for tutor-relay
//!
//! This crate contains the chat turn use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    conversation_memory::ConversationMemory,
    llm_gateway::{GatewayError, LlmGateway, StreamHandle},
};
pub use use_cases::stream_turn::{APOLOGY_MESSAGE, StreamTurnUseCase, TurnError, TurnEvents};
