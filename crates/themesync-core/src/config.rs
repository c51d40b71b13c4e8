//! Configuration file parsing, merging and persistence
//!
//! This module handles:
//! - Locating the YAML config file
//! - Parsing it with serde
//! - Merging file, environment and CLI values into a [`SyncTarget`]
//! - Validating the values a command needs
//! - Writing the file back when the resolved values changed

mod discovery;
mod merge;
mod patterns;
mod types;
mod validation;


use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use discovery::{CONFIG_FILE_NAME, ConfigDiscovery, ENV_APIKEY, ENV_STORE, ENV_THEME_ID};
pub use merge::ConfigMerger;
pub use patterns::{DEFAULT_INCLUDE, PatternMatcher};
pub use types::{
    ConfigFile, DEFAULT_ENV, DEFAULT_SASS_DESTINATION, EnvConfig, Overrides, Requirements,
    SyncTarget,
};
pub use validation::ConfigValidator;

use crate::error::{Result, SyncError};

/// Configuration manager that coordinates discovery, parsing, merging and validation
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manage the config file for a project root
    #[must_use]
    pub fn new(root: &Path, cli_config_path: Option<&Path>) -> Self {
        Self {
            path: ConfigDiscovery::config_path(root, cli_config_path),
        }
    }

    /// Path of the managed config file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config file; a missing file yields an empty config
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read(&self) -> Result<ConfigFile> {
        if !self.path.exists() {
            warn!("Could not find config file at {}", self.path.display());
            return Ok(ConfigFile::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| SyncError::io(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::new());
        }

        serde_yml::from_str(&content).map_err(|source| SyncError::Yaml {
            path: self.path.clone(),
            source,
        })
    }

    /// Load, merge and validate the target for `env`, persisting it when it changed
    ///
    /// # Errors
    ///
    /// Returns an error if the file is invalid, a required value is missing,
    /// or the updated file cannot be written.
    pub fn load(
        &self,
        env: &str,
        env_overrides: &Overrides,
        flag_overrides: &Overrides,
        requirements: Requirements,
    ) -> Result<SyncTarget> {
        let file = self.read()?;
        let target = ConfigMerger::merge(env, file.get(env), env_overrides, flag_overrides);

        ConfigValidator::validate(&target, requirements)?;
        self.save(&target)?;

        Ok(target)
    }

    /// Write the target's connection values if they differ from the stored entry
    ///
    /// Returns whether the file was rewritten. Other environments and the
    /// asset settings of this one are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, serialized or written.
    pub fn save(&self, target: &SyncTarget) -> Result<bool> {
        let mut file = self.read()?;
        let previous = file.get(&target.env);
        let updated = target.to_env_config(previous);

        if previous == Some(&updated) {
            debug!("[{}] Configuration unchanged", target.env);
            return Ok(false);
        }

        file.insert(target.env.clone(), updated);

        let yaml = serde_yml::to_string(&file).map_err(|source| SyncError::Yaml {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }
        fs::write(&self.path, yaml).map_err(|e| SyncError::io(&self.path, e))?;

        info!("[{}] Configuration was updated.", target.env);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_manager_default_path() {
        let tmp = TempDir::new().unwrap();
        let manager = ConfigManager::new(tmp.path(), None);
        assert_eq!(manager.path(), tmp.path().join("config.yml"));
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let manager = ConfigManager::new(tmp.path(), None);
        assert!(manager.read().unwrap().is_empty());
    }

    #[test]
    fn test_read_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.yml"), "development: [unclosed").unwrap();

        let manager = ConfigManager::new(tmp.path(), None);
        let err = manager.read().unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
