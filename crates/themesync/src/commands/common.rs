//! Common types and utilities for command execution

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use themesync_core::assets::{AssetPipeline, SassCommand};
use themesync_core::classifier::PathClassifier;
use themesync_core::config::{ConfigDiscovery, ConfigManager, PatternMatcher, Requirements, SyncTarget};
use themesync_core::gateway::HttpGateway;
use themesync_core::scanner::TemplateSet;
use themesync_core::sync::{SyncEngine, SyncReport, SyncReporter};

use crate::cli::ConnectionArgs;

/// Everything a command needs for one invocation
pub struct Session {
    pub root: PathBuf,
    pub config: ConfigManager,
    pub target: SyncTarget,
    pub classifier: PathClassifier,
    pub gateway: HttpGateway,
}

impl Session {
    /// Resolve the target for the current directory and connect to the store
    pub fn open(
        config_path: Option<&Path>,
        connection: &ConnectionArgs,
        requirements: Requirements,
    ) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let root = dunce::canonicalize(&cwd)
            .with_context(|| format!("Failed to resolve {}", cwd.display()))?;

        let config = ConfigManager::new(&root, config_path);
        let target = config.load(
            &connection.env,
            &ConfigDiscovery::env_overrides(),
            &connection.overrides(),
            requirements,
        )?;

        let gateway = HttpGateway::new(
            target.store_url(),
            target.apikey.as_deref().unwrap_or_default(),
        )
        .context("Failed to create store client")?;
        let classifier = PathClassifier::new(&root, target.sass_source.clone());

        Ok(Self {
            root,
            config,
            target,
            classifier,
            gateway,
        })
    }

    /// Sync engine bound to this session
    pub fn engine(&self) -> SyncEngine<'_> {
        let engine = SyncEngine::new(&self.gateway, &self.target, &self.classifier)
            .with_progress(std::io::stderr().is_terminal());

        match &self.target.sass_source {
            Some(source) => engine.with_assets(AssetPipeline::new(
                Box::new(SassCommand::new()),
                &self.root,
                source,
                &self.target.sass_destination,
            )),
            None => engine,
        }
    }

    /// Local templates eligible for sync
    pub fn templates(&self) -> anyhow::Result<TemplateSet<'_>> {
        let matcher = match &self.target.include {
            Some(patterns) => PatternMatcher::with_patterns(patterns.as_slice()),
            None => PatternMatcher::defaults(self.target.sass_source.as_deref()),
        }
        .context("Invalid include pattern")?;

        Ok(TemplateSet::new(&self.classifier, matcher))
    }
}

/// Print the summary of a batch operation
pub fn print_summary(report: &SyncReport) {
    println!("{}", SyncReporter::generate_summary(report));
}
