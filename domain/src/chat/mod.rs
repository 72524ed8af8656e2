//! Chat domain
//!
//! Requests, protocol events and the structured follow-up payload for a
//! single tutoring turn.

pub mod augment;
pub mod event;
pub mod follow_up;
pub mod request;

pub use augment::augment_message;
pub use event::{ChatEvent, StreamedChatResponse};
pub use follow_up::{FollowUpFilter, StructuredOutput};
pub use request::{ChatTurnRequest, ConversationContext};
