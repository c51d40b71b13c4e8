//! Local template discovery
//!
//! Walks the project tree and keeps every regular file that matches the
//! include patterns and does not belong to the tool itself. Results are
//! root-relative template names in lexicographic order.


use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::classifier::PathClassifier;
use crate::config::PatternMatcher;
use crate::error::Result;

/// Enumerates local files eligible for sync
pub struct TemplateSet<'a> {
    classifier: &'a PathClassifier,
    matcher: PatternMatcher,
}

impl<'a> TemplateSet<'a> {
    /// Create a template set with explicit include patterns
    #[must_use]
    pub const fn new(classifier: &'a PathClassifier, matcher: PatternMatcher) -> Self {
        Self {
            classifier,
            matcher,
        }
    }

    /// Discover templates
    ///
    /// With no explicit names every eligible file is returned. Otherwise the
    /// requested names are normalized and intersected with the eligible
    /// files; names that are not on disk are dropped without error.
    ///
    /// # Errors
    ///
    /// Returns an error if the project tree cannot be walked.
    pub fn discover<P: AsRef<Path>>(&self, explicit_names: &[P]) -> Result<Vec<String>> {
        let available = self.scan()?;

        if explicit_names.is_empty() {
            return Ok(available.into_iter().collect());
        }

        let requested: BTreeSet<String> = explicit_names
            .iter()
            .filter_map(|path| {
                let path = path.as_ref();
                match self.classifier.template_name(path) {
                    Ok(name) => Some(name),
                    Err(e) => {
                        debug!("Dropping {}: {e}", path.display());
                        None
                    }
                }
            })
            .collect();

        Ok(requested
            .into_iter()
            .filter(|name| {
                let present = available.contains(name);
                if !present {
                    debug!("Dropping {name}: not an eligible local file");
                }
                present
            })
            .collect())
    }

    /// Every eligible file under the root
    fn scan(&self) -> Result<BTreeSet<String>> {
        let root = self.classifier.root();
        let mut names = BTreeSet::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let Ok(name) = self.classifier.template_name(relative) else {
                continue;
            };

            if PathClassifier::is_reserved(&name) {
                continue;
            }
            if self.matcher.is_included(&PathBuf::from(&name)) {
                names.insert(name);
            }
        }

        Ok(names)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_empty_root() {
        let tmp = TempDir::new().unwrap();
        let classifier = PathClassifier::new(tmp.path(), None);
        let set = TemplateSet::new(&classifier, PatternMatcher::defaults(None).unwrap());

        assert!(set.discover::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_hidden_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git/templates")).unwrap();
        fs::write(tmp.path().join(".git/templates/x.html"), "x").unwrap();

        let classifier = PathClassifier::new(tmp.path(), None);
        let set = TemplateSet::new(&classifier, PatternMatcher::with_patterns(&["**"]).unwrap());

        assert!(set.discover::<&str>(&[]).unwrap().is_empty());
    }
}
