use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use themesync_core::config::{DEFAULT_ENV, Overrides};

/// Theme Template Synchronization Tool
///
/// Push, pull and watch theme templates against a remote theme store
#[derive(Parser, Debug)]
#[command(name = "themesync")]
#[command(long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use specific config file (default: ./config.yml)
    #[arg(long, global = true, value_name = "PATH", env = "THEMESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Environment entry of the config file
    #[arg(short, long, env = "THEMESYNC_ENV", default_value = DEFAULT_ENV)]
    pub env: String,

    /// API key of the store
    #[arg(short, long)]
    pub apikey: Option<String>,

    /// Store URL
    #[arg(short, long)]
    pub store: Option<String>,

    /// Theme id
    #[arg(short, long)]
    pub theme_id: Option<u64>,
}

impl ConnectionArgs {
    /// Values given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            apikey: self.apikey.clone(),
            store: self.store.clone(),
            theme_id: self.theme_id,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new theme and remember its id
    Init {
        /// Name of the new theme
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// List the themes of the store
    List {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Upload local templates (all of them when no file is given)
    Push {
        /// Files to upload
        filenames: Vec<PathBuf>,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Download templates (all of them when no file is given)
    Pull {
        /// Files to download
        filenames: Vec<PathBuf>,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Download every template of the theme into the current directory
    Checkout {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Mirror local changes to the store until interrupted
    Watch {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}
