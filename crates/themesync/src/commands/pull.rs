use std::path::{Path, PathBuf};

use anyhow::Context;
use themesync_core::config::Requirements;

use super::common::{Session, print_summary};
use crate::cli::ConnectionArgs;

pub struct Pull;

impl Pull {
    pub fn execute(
        filenames: &[PathBuf],
        connection: &ConnectionArgs,
        config_path: Option<&Path>,
    ) -> anyhow::Result<()> {
        let session = Session::open(config_path, connection, Requirements::all())?;

        let names: Vec<String> = filenames
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();

        let report = session
            .engine()
            .pull(&names)
            .context("Failed to pull templates")?;

        if !report.items.is_empty() {
            print_summary(&report);
        }

        Ok(())
    }
}
