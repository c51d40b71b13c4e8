//! Gitignore-style include pattern matching using the ignore crate

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Result, SyncError};

/// Theme directories synced when the config file names no include patterns
pub const DEFAULT_INCLUDE: &[&str] = &[
    "assets/**",
    "configs/**",
    "layouts/**",
    "locales/**",
    "sections/**",
    "snippets/**",
    "templates/**",
];

/// Matcher deciding which root-relative paths are templates
pub struct PatternMatcher {
    gitignore: Gitignore,
}

impl PatternMatcher {
    /// Build a matcher from include patterns
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid.
    pub fn with_patterns<S: AsRef<str>>(include_patterns: &[S]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new("");

        for pattern in include_patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .map_err(|source| SyncError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
        }

        let gitignore = builder.build().map_err(|source| SyncError::Pattern {
            pattern: include_patterns
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;

        Ok(Self { gitignore })
    }

    /// Default theme patterns plus the style-source tree, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the style-source name forms an invalid pattern.
    pub fn defaults(sass_source: Option<&str>) -> Result<Self> {
        let mut patterns: Vec<String> = DEFAULT_INCLUDE.iter().map(ToString::to_string).collect();
        if let Some(source) = sass_source {
            patterns.push(format!("{source}/**"));
        }
        Self::with_patterns(&patterns)
    }

    /// Check if a root-relative file path is included
    #[must_use]
    pub fn is_included(&self, path: &Path) -> bool {
        self.gitignore
            .matched_path_or_any_parents(path, false)
            .is_ignore()
    }
}
