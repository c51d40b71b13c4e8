//! Style-sheet compilation
//!
//! Sources under the configured style directory are never uploaded. A change
//! to any of them recompiles the whole tree into the destination directory.
//! The compiled output is left on disk; uploading it is a separate push.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{error, info};

use crate::error::AssetCompileError;

/// Compiles a style-sheet source directory into a destination directory
#[cfg_attr(test, mockall::automock)]
pub trait StyleCompiler {
    /// Compile every source under `source` into `dest`
    fn compile(&self, source: &Path, dest: &Path) -> Result<(), AssetCompileError>;
}

/// Runs the `sass` executable (dart-sass) in directory mode
#[derive(Debug, Clone)]
pub struct SassCommand {
    program: String,
}

impl SassCommand {
    /// Use the `sass` executable found on `PATH`
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("sass")
    }

    /// Use a specific executable
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SassCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleCompiler for SassCommand {
    fn compile(&self, source: &Path, dest: &Path) -> Result<(), AssetCompileError> {
        if !source.is_dir() {
            return Err(AssetCompileError::MissingSource(source.to_path_buf()));
        }

        let mapping = format!("{}:{}", source.display(), dest.display());
        let output = Command::new(&self.program)
            .arg("--no-source-map")
            .arg(&mapping)
            .output()
            .map_err(|source| AssetCompileError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(AssetCompileError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileResult {
    /// Compiled successfully into the destination
    Compiled {
        /// Destination directory
        dest: PathBuf,
    },
    /// Compiler failed; the batch carries on
    Failed {
        /// Failure description
        message: String,
    },
}

impl CompileResult {
    /// Whether the compile succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Compiled { .. })
    }
}

/// Compiles the project's style sources on demand
pub struct AssetPipeline {
    compiler: Box<dyn StyleCompiler>,
    source_dir: PathBuf,
    dest_dir: PathBuf,
}

impl AssetPipeline {
    /// Pipeline compiling `root/source` into `root/dest`
    #[must_use]
    pub fn new(
        compiler: Box<dyn StyleCompiler>,
        root: &Path,
        source: &str,
        dest: &str,
    ) -> Self {
        Self {
            compiler,
            source_dir: root.join(source),
            dest_dir: root.join(dest),
        }
    }

    /// Source directory
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Destination directory
    #[must_use]
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Compile the style tree; `trigger` is the template that caused the run
    ///
    /// Failures are logged and returned as [`CompileResult::Failed`], never raised.
    pub fn compile(&self, env: &str, trigger: &str) -> CompileResult {
        match self.compiler.compile(&self.source_dir, &self.dest_dir) {
            Ok(()) => {
                info!(
                    "[{env}] Compile sass at {} success and create file at {}",
                    self.source_dir.display(),
                    self.dest_dir.display()
                );
                CompileResult::Compiled {
                    dest: self.dest_dir.clone(),
                }
            }
            Err(e) => {
                error!("[{env}] Compile sass at {trigger} failed with {e}");
                CompileResult::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
