//! Behavior configuration from TOML (`[behavior]` section)

use serde::{Deserialize, Serialize};
use tutor_relay_application::BehaviorConfig;
use tutor_relay_application::config::DEFAULT_CHANNEL_CAPACITY;

/// Raw behavior configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Bound in seconds on each model call wait (None = no bound)
    pub timeout_seconds: Option<u64>,
    /// Turns retained per conversation (None = unbounded)
    pub max_turns: Option<usize>,
    /// Echo error details to clients. Development only.
    pub expose_error_details: bool,
    /// Events buffered per turn before the model stream is paused
    pub channel_capacity: usize,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            max_turns: None,
            expose_error_details: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl FileBehaviorConfig {
    /// Convert to the application-level behavior settings.
    pub fn to_behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(self.timeout_seconds)
            .with_expose_error_details(self.expose_error_details)
            .with_channel_capacity(self.channel_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_to_behavior_config() {
        let file = FileBehaviorConfig {
            timeout_seconds: Some(45),
            expose_error_details: true,
            channel_capacity: 8,
            ..Default::default()
        };
        let behavior = file.to_behavior_config();
        assert_eq!(behavior.timeout, Some(Duration::from_secs(45)));
        assert!(behavior.expose_error_details);
        assert_eq!(behavior.channel_capacity, 8);
    }
}
