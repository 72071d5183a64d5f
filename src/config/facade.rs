//! Config loading entry point: assembles sources in precedence order.

use crate::config::merge::merge_policy;
use crate::config::sources::{global_file, project_file};
use crate::config::RetraceConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;

/// Loads [`RetraceConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project
    ///
    /// Precedence (lowest to highest): defaults, global user file, project
    /// `config/retrace.toml`, project `config/{RETRACE_ENV}.toml`, environment
    /// variables such as `RETRACE__HISTORY__MAX_DEPTH`.
    pub fn load(project_root: &Path) -> Result<RetraceConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = project_file::add_to_builder(builder, project_root)?;
        let builder = builder.add_source(
            Environment::with_prefix("RETRACE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        Self::finish(builder.build()?)
    }

    /// Load only defaults and the project's own files
    pub fn load_project(project_root: &Path) -> Result<RetraceConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = project_file::add_to_builder(builder, project_root)?;
        Self::finish(builder.build()?)
    }

    /// Load defaults overlaid with one explicit file, which must exist
    pub fn load_file(path: &Path) -> Result<RetraceConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        Self::finish(builder.build()?)
    }

    fn finish(raw: Config) -> Result<RetraceConfig, ConfigError> {
        let config: RetraceConfig = raw.try_deserialize()?;
        config.validate()?;
        debug!(
            max_depth = config.history.max_depth,
            replay_failure = ?config.history.replay_failure,
            "Loaded configuration"
        );
        Ok(config)
    }
}
