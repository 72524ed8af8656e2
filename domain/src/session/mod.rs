//! Conversation messages and model stream events.

pub mod entities;
pub mod stream;
