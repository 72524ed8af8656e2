//! Presentation layer for tutor-relay
//!
//! This crate contains the CLI definition and the HTTP/SSE transport that
//! exposes the chat turn use case.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{ApiError, AppState, create_router, serve};
