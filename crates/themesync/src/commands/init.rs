use std::path::Path;

use anyhow::{Context, bail};
use themesync_core::config::Requirements;
use themesync_core::gateway::Gateway;
use tracing::info;

use super::common::Session;
use crate::cli::ConnectionArgs;

pub struct Init;

impl Init {
    pub fn execute(
        name: &str,
        connection: &ConnectionArgs,
        config_path: Option<&Path>,
    ) -> anyhow::Result<()> {
        let mut session = Session::open(config_path, connection, Requirements::without_theme())?;
        let env = session.target.env.clone();

        let response = session
            .gateway
            .create_theme(name)
            .context("Failed to create theme")?;

        if !response.ok() {
            let message = response
                .field_message("name")
                .or_else(|| response.field_message("detail"))
                .unwrap_or_else(|| format!("status {}", response.status));
            bail!("[{env}] Can't create theme \"{name}\": {message}");
        }

        let Some(theme_id) = response.json().get("id").and_then(serde_json::Value::as_u64) else {
            bail!("[{env}] Store did not return an id for theme \"{name}\"");
        };

        session.target.theme_id = Some(theme_id);
        session.config.save(&session.target)?;

        info!("[{env}] Theme [{theme_id}] \"{name}\" has been created successfully.");
        Ok(())
    }
}
