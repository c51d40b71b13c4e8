//! Path normalization and template classification
//!
//! Turns filesystem paths into root-relative, forward-slash template names and
//! decides how each one is synced. Classification is pure: nothing here
//! touches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;
use crate::error::{Result, SyncError};

/// Extensions uploaded as binary attachments
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "bmp", "tif", "tiff", "mp4", "webm",
    "mov", "ogg", "mp3", "wav", "woff", "woff2", "ttf", "otf", "eot", "pdf", "zip",
];

/// Extensions belonging to the tool itself, never synced
pub const RESERVED_EXTENSIONS: &[&str] = &["py", "yml", "yaml", "conf"];

/// Transport encoding of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Inline UTF-8 content
    Text,
    /// Binary attachment
    Media,
}

/// How a path takes part in a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Ordinary template uploaded as-is
    Template(TemplateKind),
    /// Style-sheet source, fed to the asset pipeline instead of uploaded
    AssetSource,
}

/// A normalized path with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    /// Root-relative, forward-slash template name
    pub name: String,
    /// Sync classification
    pub classification: Classification,
}

/// Classifies paths relative to a project root
#[derive(Debug, Clone)]
pub struct PathClassifier {
    root: PathBuf,
    sass_source: Option<String>,
}

impl PathClassifier {
    /// Create a classifier for `root`, optionally with a style-source directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, sass_source: Option<String>) -> Self {
        Self {
            root: root.into(),
            sass_source,
        }
    }

    /// Project root all names are relative to
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Style-source directory name, if configured
    #[must_use]
    pub fn sass_source(&self) -> Option<&str> {
        self.sass_source.as_deref()
    }

    /// Normalize a path into a template name
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidPath`] for absolute paths outside the root,
    /// relative paths escaping it, and paths naming the root itself.
    pub fn template_name(&self, path: &Path) -> Result<String> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root)
                .map_err(|_| invalid(path, "outside the project root"))?
        } else {
            path
        };

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment
                        .to_str()
                        .ok_or_else(|| invalid(path, "not valid UTF-8"))?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid(path, "outside the project root"));
                }
            }
        }

        if segments.is_empty() {
            return Err(invalid(path, "does not name a file"));
        }

        Ok(segments.join("/"))
    }

    /// Normalize and classify a path
    ///
    /// # Errors
    ///
    /// See [`PathClassifier::template_name`].
    pub fn classify(&self, path: &Path) -> Result<ClassifiedPath> {
        let name = self.template_name(path)?;
        let classification = self.classify_name(&name);
        Ok(ClassifiedPath {
            name,
            classification,
        })
    }

    /// Classify an already normalized template name
    #[must_use]
    pub fn classify_name(&self, name: &str) -> Classification {
        if self.is_asset_source(name) {
            Classification::AssetSource
        } else {
            Classification::Template(kind_of(name))
        }
    }

    /// Whether the first segment of `name` is the style-source directory
    #[must_use]
    pub fn is_asset_source(&self, name: &str) -> bool {
        self.sass_source
            .as_deref()
            .is_some_and(|source| name.split('/').next() == Some(source))
    }

    /// Whether a template name belongs to the tool rather than the theme
    ///
    /// Covers reserved extensions, the config file and anything under a
    /// hidden (source-control) directory.
    #[must_use]
    pub fn is_reserved(name: &str) -> bool {
        if name == CONFIG_FILE_NAME {
            return true;
        }
        if name.split('/').any(|segment| segment.starts_with('.')) {
            return true;
        }
        extension(name).is_some_and(|ext| RESERVED_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Text or Media, by extension alone
#[must_use]
pub fn kind_of(name: &str) -> TemplateKind {
    match extension(name) {
        Some(ext) if MEDIA_EXTENSIONS.contains(&ext.as_str()) => TemplateKind::Media,
        _ => TemplateKind::Text,
    }
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn invalid(path: &Path, reason: &'static str) -> SyncError {
    SyncError::InvalidPath {
        path: path.to_path_buf(),
        reason,
    }
}
