//! Application-level configuration.
//!
//! Controls how a chat turn behaves at runtime: model call timeouts, error
//! detail exposure and back-pressure between the turn task and the client.

use std::time::Duration;

/// Default capacity of the per-turn event channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Application behavior configuration.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Bound on opening the stream, on each wait for the next fragment, and
    /// on the structured completion. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Append the underlying error to the apology sent to the client.
    /// Development only.
    pub expose_error_details: bool,
    /// Events buffered between the turn task and the transport before the
    /// turn task waits.
    pub channel_capacity: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            expose_error_details: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Default::default()
        }
    }

    pub fn with_expose_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Zero is clamped to one; an mpsc channel cannot be unbuffered.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_timeout_seconds() {
        assert_eq!(
            BehaviorConfig::from_timeout_seconds(Some(30)).timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(BehaviorConfig::from_timeout_seconds(None).timeout, None);
    }

    #[test]
    fn test_channel_capacity_never_zero() {
        assert_eq!(BehaviorConfig::default().with_channel_capacity(0).channel_capacity, 1);
    }
}
