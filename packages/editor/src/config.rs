//! Designer configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What happens to undo history after a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryPolicy {
    /// Saving does not touch history
    #[default]
    Retain,
    /// A successful save drops all undo/redo steps
    ClearOnSave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignerConfig {
    /// Minimum time between autosave writes, in milliseconds
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Maximum undo levels (0 = unlimited)
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    #[serde(default)]
    pub history_policy: HistoryPolicy,
}

fn default_throttle_ms() -> u64 {
    500
}

fn default_max_history() -> usize {
    100
}

impl DesignerConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            max_history: default_max_history(),
            history_policy: HistoryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: DesignerConfig = serde_json::from_str(r#"{ "historyPolicy": "clearOnSave" }"#).unwrap();
        assert_eq!(config.throttle(), Duration::from_millis(500));
        assert_eq!(config.max_history, 100);
        assert_eq!(config.history_policy, HistoryPolicy::ClearOnSave);
    }
}
