//! Config file location and environment-variable overrides

use std::path::{Path, PathBuf};

use tracing::warn;

use super::types::Overrides;

/// Config file name looked up in the project root
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Environment variable holding the API key
pub const ENV_APIKEY: &str = "THEMESYNC_APIKEY";
/// Environment variable holding the store URL
pub const ENV_STORE: &str = "THEMESYNC_STORE";
/// Environment variable holding the theme id
pub const ENV_THEME_ID: &str = "THEMESYNC_THEME_ID";

/// Config file and environment discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Path of the config file: the CLI-provided one, else `config.yml` in the root
    #[must_use]
    pub fn config_path(root: &Path, cli_path: Option<&Path>) -> PathBuf {
        cli_path.map_or_else(|| root.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Read overrides from the process environment
    #[must_use]
    pub fn env_overrides() -> Overrides {
        Self::overrides_from(|key| std::env::var(key).ok())
    }

    /// Build overrides from an arbitrary variable lookup
    pub fn overrides_from(lookup: impl Fn(&str) -> Option<String>) -> Overrides {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let theme_id = non_empty(ENV_THEME_ID).and_then(|raw| match raw.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Ignoring {ENV_THEME_ID}={raw}: not a numeric theme id");
                None
            }
        });

        Overrides {
            apikey: non_empty(ENV_APIKEY),
            store: non_empty(ENV_STORE),
            theme_id,
        }
    }
}
