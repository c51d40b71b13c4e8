//! Sync orchestration - push, pull and delete against the store

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info};

use super::progress::batch_progress;
use super::{ItemStatus, Operation, PushMode, SyncReport};
use crate::assets::{AssetPipeline, CompileResult};
use crate::classifier::{Classification, PathClassifier, TemplateKind};
use crate::config::SyncTarget;
use crate::error::{Result, SyncError};
use crate::gateway::{ApiResponse, Gateway, RemoteTemplate, Template};

/// Pause between local writes during a pull, to respect store rate limits
pub const DEFAULT_WRITE_DELAY: Duration = Duration::from_millis(80);

/// Main sync engine
pub struct SyncEngine<'a> {
    gateway: &'a dyn Gateway,
    target: &'a SyncTarget,
    classifier: &'a PathClassifier,
    assets: Option<AssetPipeline>,
    write_delay: Duration,
    show_progress: bool,
}

impl<'a> SyncEngine<'a> {
    /// Create a sync engine for one resolved target
    #[must_use]
    pub const fn new(
        gateway: &'a dyn Gateway,
        target: &'a SyncTarget,
        classifier: &'a PathClassifier,
    ) -> Self {
        Self {
            gateway,
            target,
            classifier,
            assets: None,
            write_delay: DEFAULT_WRITE_DELAY,
            show_progress: false,
        }
    }

    /// Compile style sources through `pipeline` instead of uploading them
    #[must_use]
    pub fn with_assets(mut self, pipeline: AssetPipeline) -> Self {
        self.assets = Some(pipeline);
        self
    }

    /// Override the pause between writes during a pull
    #[must_use]
    pub const fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    /// Show a progress bar for batch operations
    #[must_use]
    pub const fn with_progress(mut self, visible: bool) -> Self {
        self.show_progress = visible;
        self
    }

    fn env(&self) -> &str {
        &self.target.env
    }

    fn theme_id(&self) -> u64 {
        self.target.theme()
    }

    /// Upload templates
    ///
    /// Style sources are compiled instead of uploaded. In watch mode the push
    /// stops right after the compile; in batch mode the style tree is compiled
    /// at most once and the remaining names are still uploaded.
    pub fn push<S: AsRef<str>>(&self, names: &[S], mode: PushMode) -> SyncReport {
        let env = self.env();
        let mut report = SyncReport::new(Operation::Push);

        info!("[{env}] Connecting to {}", self.target.store_url());
        info!(
            "[{env}] Uploading {} files to theme id {}",
            names.len(),
            self.theme_id()
        );

        let progress = batch_progress(env, names.len(), self.show_progress);
        let mut compiled: Option<ItemStatus> = None;

        for name in names {
            let name = name.as_ref();
            progress.set_message(name.to_string());

            match self.classifier.classify(Path::new(name)) {
                Err(e) => {
                    error!("[{env}] {name} -> {e}");
                    report.failed(name, e.to_string());
                }
                Ok(classified) => match classified.classification {
                    Classification::AssetSource => {
                        let status = compiled
                            .get_or_insert_with(|| self.compile_assets(&classified.name))
                            .clone();
                        report.record(classified.name, status);

                        if mode == PushMode::Watch {
                            progress.finish_and_clear();
                            return report;
                        }
                    }
                    Classification::Template(kind) => {
                        match self.push_template(&classified.name, kind) {
                            Ok(()) => report.synced(classified.name),
                            Err(message) => {
                                error!("[{env}] {} -> {message}", classified.name);
                                report.failed(classified.name, message);
                            }
                        }
                    }
                },
            }

            progress.inc(1);
        }

        progress.finish_and_clear();
        report
    }

    fn compile_assets(&self, trigger: &str) -> ItemStatus {
        let Some(pipeline) = &self.assets else {
            let message = "no style compiler configured".to_string();
            error!("[{}] {trigger} -> {message}", self.env());
            return ItemStatus::Failed(message);
        };

        match pipeline.compile(self.env(), trigger) {
            CompileResult::Compiled { .. } => ItemStatus::Compiled,
            CompileResult::Failed { message } => ItemStatus::Failed(message),
        }
    }

    fn push_template(&self, name: &str, kind: TemplateKind) -> std::result::Result<(), String> {
        let path = self.classifier.root().join(name);
        let template = match kind {
            TemplateKind::Media => fs::read(&path).map(|bytes| Template::media(name, bytes)),
            TemplateKind::Text => {
                fs::read_to_string(&path).map(|content| Template::text(name, content))
            }
        }
        .map_err(|e| format!("Can't read {}: {e}", path.display()))?;

        let response = self
            .gateway
            .create_or_update_template(self.theme_id(), &template)
            .map_err(|e| e.to_string())?;

        if response.ok() {
            debug!("[{}] Uploaded {name}", self.env());
            Ok(())
        } else {
            Err(response
                .field_message("file")
                .or_else(|| response.field_message("content"))
                .unwrap_or_else(|| format!("Can't update to theme id #{}.", self.theme_id())))
        }
    }

    /// Download templates into the project root
    ///
    /// With no names the whole theme is listed; otherwise each name is fetched
    /// on its own. A listing that is not a JSON array means the theme does not
    /// exist: one informational line is logged and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error only when the theme listing itself cannot be fetched.
    pub fn pull<S: AsRef<str>>(&self, names: &[S]) -> Result<SyncReport> {
        let env = self.env();
        let mut report = SyncReport::new(Operation::Pull);

        info!("[{env}] Connecting to {}", self.target.store_url());

        let entries = if names.is_empty() {
            let response = self.gateway.get_templates(self.theme_id())?;
            match response.body {
                Value::Array(entries) => entries,
                _ => {
                    let missing = SyncError::RemoteNotFound {
                        theme_id: self.theme_id(),
                    };
                    info!("[{env}] {missing}");
                    return Ok(report);
                }
            }
        } else {
            self.fetch_named(names, &mut report)
        };

        info!(
            "[{env}] Pulling {} files from theme id {}",
            entries.len(),
            self.theme_id()
        );

        let progress = batch_progress(env, entries.len(), self.show_progress);

        for entry in entries {
            let label = entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("<unknown>")
                .to_string();

            match serde_json::from_value::<RemoteTemplate>(entry) {
                Ok(remote) => {
                    progress.set_message(remote.name.clone());
                    match self.write_template(&remote) {
                        Ok(name) => report.synced(name),
                        Err(message) => {
                            error!("[{env}] {} -> {message}", remote.name);
                            report.failed(remote.name, message);
                        }
                    }
                    if !self.write_delay.is_zero() {
                        thread::sleep(self.write_delay);
                    }
                }
                Err(e) => {
                    let message = format!("Unexpected template payload: {e}");
                    error!("[{env}] {label} -> {message}");
                    report.failed(label, message);
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        Ok(report)
    }

    fn fetch_named<S: AsRef<str>>(&self, names: &[S], report: &mut SyncReport) -> Vec<Value> {
        let env = self.env();
        let mut entries = Vec::new();

        for name in names {
            let name = name.as_ref();
            let name = match self.classifier.template_name(Path::new(name)) {
                Ok(name) => name,
                Err(e) => {
                    error!("[{env}] {name} -> {e}");
                    report.failed(name, e.to_string());
                    continue;
                }
            };

            let failure = match self.gateway.get_template(self.theme_id(), &name) {
                Ok(response) if response.ok() => match response.body {
                    Value::Array(found) if found.is_empty() => {
                        Some(format!("Not found in theme id #{}.", self.theme_id()))
                    }
                    Value::Array(found) => {
                        entries.extend(found);
                        None
                    }
                    body @ Value::Object(_) => {
                        entries.push(body);
                        None
                    }
                    _ => Some("Unexpected template payload".to_string()),
                },
                Ok(response) => Some(fetch_failure(&response, self.theme_id())),
                Err(e) => Some(e.to_string()),
            };

            if let Some(message) = failure {
                error!("[{env}] {name} -> {message}");
                report.failed(name, message);
            }
        }

        entries
    }

    fn write_template(&self, remote: &RemoteTemplate) -> std::result::Result<String, String> {
        let name = self
            .classifier
            .template_name(Path::new(&remote.name))
            .map_err(|e| e.to_string())?;
        let path = self.classifier.root().join(&name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Can't create {}: {e}", parent.display()))?;
        }

        if let Some(url) = remote.file_url() {
            let bytes = self.gateway.download(url).map_err(|e| e.to_string())?;
            write_file(&path, &bytes)?;
        } else {
            let content = remote.content.as_deref().unwrap_or_default();
            write_file(&path, content.as_bytes())?;
        }

        Ok(name)
    }

    /// Remove templates from the store
    ///
    /// No local existence check is made: every name issues one delete call.
    pub fn delete<S: AsRef<str>>(&self, names: &[S]) -> SyncReport {
        let env = self.env();
        let mut report = SyncReport::new(Operation::Delete);

        info!("[{env}] Connecting to {}", self.target.store_url());
        info!(
            "[{env}] Deleting {} files from theme id {}",
            names.len(),
            self.theme_id()
        );

        let progress = batch_progress(env, names.len(), self.show_progress);

        for name in names {
            let name = name.as_ref();
            progress.set_message(name.to_string());

            let outcome = self
                .classifier
                .template_name(Path::new(name))
                .map_err(|e| (name.to_string(), e.to_string()))
                .and_then(|name| match self.gateway.delete_template(self.theme_id(), &name) {
                    Ok(response) if response.ok() => Ok(name),
                    Ok(response) => {
                        let message = response.field_message("detail").unwrap_or_else(|| {
                            format!("Can't delete from theme id #{}.", self.theme_id())
                        });
                        Err((name, message))
                    }
                    Err(e) => Err((name, e.to_string())),
                });

            match outcome {
                Ok(name) => report.synced(name),
                Err((name, message)) => {
                    error!("[{env}] {name} -> {message}");
                    report.failed(name, message);
                }
            }

            progress.inc(1);
        }

        progress.finish_and_clear();
        report
    }
}

fn fetch_failure(response: &ApiResponse, theme_id: u64) -> String {
    response
        .field_message("detail")
        .unwrap_or_else(|| format!("Can't fetch from theme id #{theme_id}."))
}

fn write_file(path: &Path, bytes: &[u8]) -> std::result::Result<(), String> {
    fs::write(path, bytes).map_err(|e| format!("Can't write {}: {e}", path.display()))
}
