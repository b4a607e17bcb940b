//! Config loading and validation.

use super::model::Config;
use crate::error::{Result, VolumeError};
use crate::volume::validate_component;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(VolumeError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            VolumeError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| VolumeError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            VolumeError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// - `hostname`, when set, must be non-empty and free of path separators
    /// - `log_filter` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if let Some(hostname) = &self.hostname {
            validate_component("hostname", hostname)
                .map_err(|e| VolumeError::UserError(format!("config validation failed: {}", e)))?;
        }

        if self.log_filter.trim().is_empty() {
            return Err(VolumeError::UserError(
                "config validation failed: log_filter must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
