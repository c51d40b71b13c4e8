//! Configuration types and structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Environment used when none is given on the command line
pub const DEFAULT_ENV: &str = "development";

/// Directory compiled style-sheets are written to when not configured
pub const DEFAULT_SASS_DESTINATION: &str = "assets";

/// Settings stored for one environment in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnvConfig {
    /// API key for the theme store
    #[serde(default)]
    pub apikey: Option<String>,

    /// Base URL of the theme store
    #[serde(default)]
    pub store: Option<String>,

    /// Theme the templates belong to
    #[serde(default)]
    pub theme_id: Option<u64>,

    /// Style-sheet source directory (first path segment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sass_source: Option<String>,

    /// Directory compiled style-sheets are written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sass_destination: Option<String>,

    /// Include patterns for template discovery (replaces the defaults)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

/// Whole config file: one entry per environment
pub type ConfigFile = BTreeMap<String, EnvConfig>;

/// Connection values supplied by one override layer (environment or flags)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Overrides {
    /// API key override
    pub apikey: Option<String>,
    /// Store URL override
    pub store: Option<String>,
    /// Theme id override
    pub theme_id: Option<u64>,
}

/// Fully resolved, immutable sync target for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// Environment name the target was resolved for
    pub env: String,
    /// API key
    pub apikey: Option<String>,
    /// Store base URL
    pub store: Option<String>,
    /// Theme id
    pub theme_id: Option<u64>,
    /// Style-sheet source directory, if the project has one
    pub sass_source: Option<String>,
    /// Compiled style-sheet destination
    pub sass_destination: String,
    /// Include patterns, `None` for the defaults
    pub include: Option<Vec<String>>,
}

impl SyncTarget {
    /// Theme id, or 0 when unresolved (only reachable for commands that waive it)
    #[must_use]
    pub fn theme(&self) -> u64 {
        self.theme_id.unwrap_or_default()
    }

    /// Store URL, or an empty string when unresolved
    #[must_use]
    pub fn store_url(&self) -> &str {
        self.store.as_deref().unwrap_or_default()
    }

    /// The connection values as they are persisted in the config file
    #[must_use]
    pub fn to_env_config(&self, previous: Option<&EnvConfig>) -> EnvConfig {
        let previous = previous.cloned().unwrap_or_default();
        EnvConfig {
            apikey: self.apikey.clone(),
            store: self.store.clone(),
            theme_id: self.theme_id,
            ..previous
        }
    }
}

/// Which connection values a command needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    /// API key must be set
    pub apikey: bool,
    /// Store URL must be set
    pub store: bool,
    /// Theme id must be set
    pub theme_id: bool,
}

impl Requirements {
    /// Everything required (push, pull, checkout, watch)
    #[must_use]
    pub const fn all() -> Self {
        Self {
            apikey: true,
            store: true,
            theme_id: true,
        }
    }

    /// Theme id waived (init, list)
    #[must_use]
    pub const fn without_theme() -> Self {
        Self {
            theme_id: false,
            ..Self::all()
        }
    }
}
