//! Configuration Loader
//!
//! Layers an optional TOML file under `HARVESTER_` environment variables
//! using the `config` crate, then validates the result.

use super::HarvesterConfig;
use crate::error::ConfigError;
use ::config::{Config, Environment, File};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};

const ENV_PREFIX: &str = "HARVESTER";
const CONFIG_PATH_VAR: &str = "HARVESTER_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "config/harvester.toml";

#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    file_required: bool,
    env_source: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Loader reading `HARVESTER_CONFIG_PATH` (required when set) or
    /// `config/harvester.toml` (optional), then the process environment.
    pub fn from_process_env() -> Self {
        match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => Self::default().with_file(path, true),
            _ => Self::default().with_file(DEFAULT_CONFIG_FILE, false),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, required: bool) -> Self {
        self.file = Some(path.into());
        self.file_required = required;
        self
    }

    /// Replace the process environment with an explicit variable map
    pub fn with_env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    pub fn load(self) -> Result<HarvesterConfig, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            debug!(path = %path.display(), required = self.file_required, "Adding configuration file source");
            builder = builder.add_source(File::from(path.as_path()).required(self.file_required));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(self.env_source),
        );

        let config: HarvesterConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        info!(
            query = %config.search.text,
            batch_size = config.dispatch.batch_size,
            resumable = config.checkpoint.resumable,
            processor_queue = %config.dispatch.processor_queue,
            checkpoint_table = %config.checkpoint.table_name,
            database_url = %config.redacted_database_url(),
            "Configuration loaded"
        );

        Ok(config)
    }
}
