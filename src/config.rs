//! Configuration System
//!
//! Layered configuration for history behavior and logging. Values come from
//! built-in defaults, a user-level file, project files, and `RETRACE__*`
//! environment variables, in increasing order of precedence.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Default undo depth per command context; 0 keeps the whole history
pub const DEFAULT_MAX_DEPTH: usize = 0;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetraceConfig {
    /// Undo history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What happens to a history entry whose undo or redo fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayFailurePolicy {
    /// Put the entry back on the stack it was taken from, so the replay can be retried
    #[default]
    Restore,
    /// Leave the entry off both stacks
    Discard,
}

/// Settings applied to every command context a manager creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum undo entries per context; 0 disables the limit
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub replay_failure: ReplayFailurePolicy,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            replay_failure: ReplayFailurePolicy::default(),
        }
    }
}

impl RetraceConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate().map_err(ConfigError::Invalid)
    }
}
