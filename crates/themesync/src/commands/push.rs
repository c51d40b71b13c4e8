use std::path::{Path, PathBuf};

use anyhow::Context;
use themesync_core::config::Requirements;
use themesync_core::sync::PushMode;
use tracing::warn;

use super::common::{Session, print_summary};
use crate::cli::ConnectionArgs;

pub struct Push;

impl Push {
    pub fn execute(
        filenames: &[PathBuf],
        connection: &ConnectionArgs,
        config_path: Option<&Path>,
    ) -> anyhow::Result<()> {
        let session = Session::open(config_path, connection, Requirements::all())?;

        let names = session
            .templates()?
            .discover(filenames)
            .context("Failed to scan templates")?;

        if names.is_empty() {
            warn!("[{}] No templates to push", session.target.env);
            return Ok(());
        }

        let report = session.engine().push(&names, PushMode::Batch);
        print_summary(&report);

        Ok(())
    }
}
