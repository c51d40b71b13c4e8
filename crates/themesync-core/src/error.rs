//! Error types for the themesync library

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by configuration, classification and synchronization
#[derive(Error, Debug)]
pub enum SyncError {
    /// Required credential or identifier missing
    #[error("[{env}] argument {} required.", describe_missing(.missing))]
    Configuration {
        /// Environment the configuration was resolved for
        env: String,
        /// Flags that must be supplied
        missing: Vec<&'static str>,
    },

    /// Theme does not exist on the remote store
    #[error("Theme id #{theme_id} doesn't exist in the system.")]
    RemoteNotFound {
        /// Theme that was requested
        theme_id: u64,
    },

    /// Single template failed to sync
    #[error("{name} -> {message}")]
    ItemSync {
        /// Template name
        name: String,
        /// Server-provided or local failure message
        message: String,
    },

    /// Style-sheet compilation failed
    #[error(transparent)]
    AssetCompile(#[from] AssetCompileError),

    /// Path cannot be mapped to a template name inside the project root
    #[error("Invalid template path {}: {reason}", .path.display())]
    InvalidPath {
        /// Offending path
        path: PathBuf,
        /// Why the path was rejected
        reason: &'static str,
    },

    /// Remote store could not be reached or answered garbage
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Local filesystem failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file could not be parsed or written
    #[error("Invalid config file {}: {source}", .path.display())]
    Yaml {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: serde_yml::Error,
    },

    /// Project tree could not be walked
    #[error("Failed to scan project directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Include pattern is not a valid glob
    #[error("Invalid include pattern '{pattern}': {source}")]
    Pattern {
        /// Offending pattern
        pattern: String,
        /// Underlying error
        source: ignore::Error,
    },

    /// Filesystem watcher could not be started
    #[error("Failed to watch project directory: {0}")]
    Watch(#[from] notify::Error),
}

fn describe_missing(missing: &[&str]) -> String {
    let verb = if missing.len() == 1 { "is" } else { "are" };
    format!("{} {verb}", missing.join(", "))
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the HTTP gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid store URL
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),

    /// Download answered with a non-success status
    #[error("Download of {url} failed with status {status}")]
    Download {
        /// URL that was fetched
        url: String,
        /// HTTP status code
        status: u16,
    },
}

/// Style compiler failure
#[derive(Error, Debug)]
pub enum AssetCompileError {
    /// Compiler executable could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked
        program: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Compiler exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        /// Program that was invoked
        program: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Source directory is missing
    #[error("source directory {} does not exist", .0.display())]
    MissingSource(PathBuf),
}

/// Result type alias using [`SyncError`]
pub type Result<T> = std::result::Result<T, SyncError>;
