//! HTTP/SSE transport
//!
//! Routes:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET` | `/` | Welcome message |
//! | `GET` | `/health` | Liveness |
//! | `POST` | `/aitutor/chat` | Stream one chat turn (SSE) |
//! | `GET` | `/aitutor/conversations/{id}` | Read stored history |
//! | `DELETE` | `/aitutor/conversations/{id}` | Clear stored history |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, serve};
pub use state::AppState;
