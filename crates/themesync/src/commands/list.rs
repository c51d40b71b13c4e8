use std::path::Path;

use anyhow::Context;
use themesync_core::config::Requirements;
use themesync_core::gateway::{Gateway, Theme};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::common::Session;
use crate::cli::ConnectionArgs;

pub struct List;

impl List {
    pub fn execute(connection: &ConnectionArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
        let session = Session::open(config_path, connection, Requirements::without_theme())?;
        let env = &session.target.env;

        let response = session
            .gateway
            .get_themes()
            .context("Failed to list themes")?;

        let themes = if response.ok() {
            themes_from(response.json())
        } else {
            Vec::new()
        };

        if themes.is_empty() {
            warn!("[{env}] Missing Themes in {}", session.target.store_url());
            return Ok(());
        }

        info!("[{env}] Available themes:");
        for theme in &themes {
            info!("[{env}] {}", describe(theme));
        }

        Ok(())
    }
}

/// Themes from the `results` envelope of a listing
fn themes_from(body: &Value) -> Vec<Theme> {
    let Some(results) = body.get("results") else {
        debug!("Theme listing has no results field");
        return Vec::new();
    };

    serde_json::from_value(results.clone()).unwrap_or_else(|e| {
        warn!("Unexpected theme listing: {e}");
        Vec::new()
    })
}

fn describe(theme: &Theme) -> String {
    let active = if theme.active { " (Active)" } else { "" };
    format!("[{}] {}{active}", theme.id, theme.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_themes_from_results_envelope() {
        let body = json!({
            "count": 2,
            "results": [
                {"id": 1, "name": "Default", "active": true},
                {"id": 2, "name": "Summer", "active": false}
            ]
        });

        let themes = themes_from(&body);
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].name, "Default");
        assert!(themes[0].active);
    }

    #[test]
    fn test_themes_from_missing_or_bare_listing() {
        assert!(themes_from(&json!({"results": []})).is_empty());
        assert!(themes_from(&json!({"detail": "Not found."})).is_empty());
        assert!(themes_from(&json!([{"id": 1, "name": "Default"}])).is_empty());
    }

    #[test]
    fn test_describe_theme() {
        let active = Theme {
            id: 1,
            name: "Default".to_string(),
            active: true,
        };
        let draft = Theme {
            id: 2,
            name: "Summer".to_string(),
            active: false,
        };

        assert_eq!(describe(&active), "[1] Default (Active)");
        assert_eq!(describe(&draft), "[2] Summer");
    }
}
