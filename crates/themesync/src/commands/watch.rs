use std::path::Path;

use anyhow::Context;
use themesync_core::config::Requirements;
use themesync_core::watch::{ChangeWatcher, DEFAULT_DEBOUNCE, watch_batches};
use tracing::info;

use super::common::Session;
use crate::cli::ConnectionArgs;

pub struct Watch;

impl Watch {
    pub fn execute(connection: &ConnectionArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
        let session = Session::open(config_path, connection, Requirements::all())?;
        let env = &session.target.env;
        let store = session.target.store_url();
        let theme_id = session.target.theme();

        // Keep the handle alive for as long as the loop runs
        let (_handle, batches) = watch_batches(&session.root, DEFAULT_DEBOUNCE)
            .with_context(|| format!("Failed to watch {}", session.root.display()))?;

        info!("[{env}] Current store {store}");
        info!("[{env}] Current theme id {theme_id}");
        info!("[{env}] Preview theme URL {store}?preview_theme={theme_id}");
        info!(
            "[{env}] Watching for file changes in {}",
            session.root.display()
        );
        info!("[{env}] Press Ctrl + C to stop");

        let engine = session.engine();
        ChangeWatcher::new(&session.classifier).run(batches, &engine);

        Ok(())
    }
}
