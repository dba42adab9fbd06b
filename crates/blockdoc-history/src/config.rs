//! History configuration.
//!
//! Recognized keys (camelCase in TOML/JSON):
//! - `maxHistoryLength`: cap on the undo and redo stacks (default 30)
//! - `historyDebounceTime`: hard cap in ms on one open transaction under
//!   continuous input (default 300)
//! - `newGroupDelay`: input pause in ms that closes a transaction (default 500)
//! - `globalUndoRedo`: resolve undo/redo shortcuts while unfocused (default false)
//! - `autoCompact`: trim unreachable op-log records on eviction (default true)

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 30;
pub const DEFAULT_HISTORY_DEBOUNCE_TIME_MS: u64 = 300;
pub const DEFAULT_NEW_GROUP_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    pub max_history_length: usize,
    /// Milliseconds.
    pub history_debounce_time: u64,
    /// Milliseconds.
    pub new_group_delay: u64,
    pub global_undo_redo: bool,
    /// Drop op-log records no undo step can reach any more whenever the
    /// oldest step is evicted.
    pub auto_compact: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
            history_debounce_time: DEFAULT_HISTORY_DEBOUNCE_TIME_MS,
            new_group_delay: DEFAULT_NEW_GROUP_DELAY_MS,
            global_undo_redo: false,
            auto_compact: true,
        }
    }
}

impl HistoryConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_length == 0 {
            return Err(ConfigError::Invalid(
                "maxHistoryLength must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_max_history_length(mut self, len: usize) -> Self {
        self.max_history_length = len;
        self
    }

    pub fn with_history_debounce_time(mut self, ms: u64) -> Self {
        self.history_debounce_time = ms;
        self
    }

    pub fn with_new_group_delay(mut self, ms: u64) -> Self {
        self.new_group_delay = ms;
        self
    }

    pub fn with_global_undo_redo(mut self, enabled: bool) -> Self {
        self.global_undo_redo = enabled;
        self
    }

    pub fn with_auto_compact(mut self, enabled: bool) -> Self {
        self.auto_compact = enabled;
        self
    }
}
