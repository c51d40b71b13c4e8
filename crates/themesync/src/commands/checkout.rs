use std::path::Path;

use anyhow::Context;
use themesync_core::config::Requirements;
use tracing::info;

use super::common::{Session, print_summary};
use crate::cli::ConnectionArgs;

pub struct Checkout;

impl Checkout {
    pub fn execute(connection: &ConnectionArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
        let session = Session::open(config_path, connection, Requirements::all())?;

        info!(
            "[{}] Checking out theme id {} into {}",
            session.target.env,
            session.target.theme(),
            session.root.display()
        );

        let report = session
            .engine()
            .pull::<&str>(&[])
            .context("Failed to check out theme")?;

        if !report.items.is_empty() {
            print_summary(&report);
        }

        Ok(())
    }
}
