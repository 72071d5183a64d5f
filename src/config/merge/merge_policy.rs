//! Merge rules: defaults that every later source overrides.

use crate::config::DEFAULT_MAX_DEPTH;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("history.max_depth", DEFAULT_MAX_DEPTH as u64)?
        .set_default("history.replay_failure", "restore")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
