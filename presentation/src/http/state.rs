//! Application state shared across all route handlers.

use std::time::Instant;
use tutor_relay_application::StreamTurnUseCase;

/// Shared application state.
///
/// The use case holds its collaborators behind `Arc`s, so cloning per
/// request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Chat turn orchestrator.
    pub turns: StreamTurnUseCase,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(turns: StreamTurnUseCase) -> Self {
        Self {
            turns,
            start_time: Instant::now(),
        }
    }
}
