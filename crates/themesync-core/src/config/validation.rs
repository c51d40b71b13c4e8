//! Configuration validation and error reporting

use super::types::{Requirements, SyncTarget};
use crate::error::{Result, SyncError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that every value the command needs is present
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] naming every missing flag.
    pub fn validate(target: &SyncTarget, requirements: Requirements) -> Result<()> {
        let mut missing = Vec::new();

        if requirements.apikey && target.apikey.as_deref().is_none_or(str::is_empty) {
            missing.push("-a/--apikey");
        }
        if requirements.store && target.store.as_deref().is_none_or(str::is_empty) {
            missing.push("-s/--store");
        }
        if requirements.theme_id && target.theme_id.is_none() {
            missing.push("-t/--theme-id");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Configuration {
                env: target.env.clone(),
                missing,
            })
        }
    }
}
