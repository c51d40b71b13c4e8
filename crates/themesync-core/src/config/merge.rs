//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! Precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file entry for the selected environment
//!
//! A layer only wins when it actually supplies a value; an absent flag never
//! clears a value coming from the environment or the file. Asset settings and
//! include patterns only come from the file.

use super::types::{DEFAULT_SASS_DESTINATION, EnvConfig, Overrides, SyncTarget};

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Resolve the sync target for `env` from every layer
    #[must_use]
    pub fn merge(
        env: &str,
        file: Option<&EnvConfig>,
        env_overrides: &Overrides,
        flag_overrides: &Overrides,
    ) -> SyncTarget {
        let file = file.cloned().unwrap_or_default();

        SyncTarget {
            env: env.to_string(),
            apikey: flag_overrides
                .apikey
                .clone()
                .or_else(|| env_overrides.apikey.clone())
                .or(file.apikey),
            store: flag_overrides
                .store
                .clone()
                .or_else(|| env_overrides.store.clone())
                .or(file.store)
                .map(|s| s.trim_end_matches('/').to_string()),
            theme_id: flag_overrides
                .theme_id
                .or(env_overrides.theme_id)
                .or(file.theme_id),
            sass_source: file
                .sass_source
                .map(|s| s.trim_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            sass_destination: file
                .sass_destination
                .unwrap_or_else(|| DEFAULT_SASS_DESTINATION.to_string()),
            include: file.include,
        }
    }
}
