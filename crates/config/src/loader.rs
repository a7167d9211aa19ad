//! Configuration loader for warmstart
//!
//! Resolution order: an explicit path, then the `WARMSTART_CONFIG` environment
//! variable, then built-in defaults.

use crate::config::Config;
use std::path::{Path, PathBuf};
use warmstart_core::{constants::WARMSTART_CONFIG_VAR, Error, Result};

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Configuration loader that handles startup configuration
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Explicit configuration file, takes precedence over the environment
    path: Option<PathBuf>,
    /// Whether to consult `WARMSTART_CONFIG`
    skip_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from this file instead of the environment or defaults
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Ignore `WARMSTART_CONFIG`
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Resolve which file (if any) the configuration will be read from
    pub fn source(&self) -> ConfigSource {
        if let Some(path) = &self.path {
            return ConfigSource::File(path.clone());
        }
        if !self.skip_env {
            if let Some(path) = std::env::var_os(WARMSTART_CONFIG_VAR).filter(|v| !v.is_empty()) {
                return ConfigSource::File(PathBuf::from(path));
            }
        }
        ConfigSource::Defaults
    }

    /// Load and validate the configuration
    pub fn load(self) -> Result<(Config, ConfigSource)> {
        let source = self.source();
        let config = match &source {
            ConfigSource::File(path) => load_file(path)?,
            ConfigSource::Defaults => {
                tracing::debug!("no configuration file given, using built-in defaults");
                Config::default()
            }
        };
        config.validate()?;
        Ok((config, source))
    }
}

fn load_file(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::file_system(path, "read configuration", e))?;

    let config = Config::from_json(&text).map_err(|e| {
        Error::configuration(format!("invalid configuration '{}': {}", path.display(), e))
    })?;

    tracing::debug!(
        path = %path.display(),
        applications = config.applications.len(),
        "loaded configuration"
    );
    Ok(config)
}
