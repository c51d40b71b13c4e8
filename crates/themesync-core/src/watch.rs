//! Filesystem watching for continuous sync
//!
//! Debounced filesystem events are collected into batches on a channel. The
//! [`ChangeWatcher`] drains that channel one event at a time and turns each
//! relevant change into a single push or delete.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{DebounceEventResult, Debouncer, RecommendedCache, new_debouncer};
use tracing::{debug, error, info};

use crate::classifier::PathClassifier;
use crate::error::Result;
use crate::sync::{PushMode, SyncEngine, SyncReport};

/// Default debounce window for filesystem events
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Tooling directories whose changes never reach the store
pub const IGNORED_DIRS: &[&str] = &["node_modules", "__pycache__", "site-packages", ".idea"];

/// Kind of a local change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File created or moved into the tree
    Added,
    /// File content changed
    Modified,
    /// File removed or moved out of the tree
    Deleted,
}

/// One local change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// What happened
    pub kind: ChangeKind,
    /// Absolute path of the file
    pub path: PathBuf,
}

impl ChangeEvent {
    /// Build an event
    #[must_use]
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Keeps the OS watcher alive; dropping it closes the batch channel
pub type WatchHandle = Debouncer<RecommendedWatcher, RecommendedCache>;

/// Start watching `root` recursively
///
/// Every debounced burst of events arrives as one batch on the returned
/// receiver. The channel closes when the handle is dropped.
///
/// # Errors
///
/// Returns an error if the OS watcher cannot be created or `root` cannot be
/// watched.
pub fn watch_batches(
    root: &Path,
    debounce: Duration,
) -> Result<(WatchHandle, Receiver<Vec<ChangeEvent>>)> {
    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
        match result {
            Ok(events) => {
                let batch: Vec<ChangeEvent> = events
                    .iter()
                    .flat_map(|event| convert_event(&event.event))
                    .collect();
                if !batch.is_empty() {
                    // Receiver gone means the watcher is shutting down
                    let _ = tx.send(batch);
                }
            }
            Err(errors) => {
                for e in errors {
                    error!("Watcher error: {e}");
                }
            }
        }
    })?;

    debouncer.watch(root, RecursiveMode::Recursive)?;
    debug!("Watching {}", root.display());

    Ok((debouncer, rx))
}

/// Translate a notify event into zero or more changes
///
/// A rename seen as one event is split into a delete of the old path and an
/// add of the new one.
#[must_use]
pub fn convert_event(event: &Event) -> Vec<ChangeEvent> {
    let paths = &event.paths;
    let each = |kind: ChangeKind| -> Vec<ChangeEvent> {
        paths.iter().map(|p| ChangeEvent::new(kind, p.clone())).collect()
    };

    match &event.kind {
        EventKind::Create(_) => each(ChangeKind::Added),
        EventKind::Remove(_) => each(ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => each(ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => each(ChangeKind::Added),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if paths.len() == 2 => vec![
            ChangeEvent::new(ChangeKind::Deleted, paths[0].clone()),
            ChangeEvent::new(ChangeKind::Added, paths[1].clone()),
        ],
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) => each(ChangeKind::Modified),
        _ => Vec::new(),
    }
}

/// Dispatches local changes to the sync engine
pub struct ChangeWatcher<'a> {
    classifier: &'a PathClassifier,
}

impl<'a> ChangeWatcher<'a> {
    /// Create a watcher resolving names against `classifier`'s root
    #[must_use]
    pub const fn new(classifier: &'a PathClassifier) -> Self {
        Self { classifier }
    }

    /// Consume batches until the stream ends
    ///
    /// Events are handled strictly one at a time, in arrival order.
    pub fn run<I>(&self, batches: I, engine: &SyncEngine<'_>)
    where
        I: IntoIterator<Item = Vec<ChangeEvent>>,
    {
        for batch in batches {
            for event in batch {
                self.handle(&event, engine);
            }
        }
        info!("Watch stream closed");
    }

    /// Handle one change; returns the engine report, or `None` if discarded
    pub fn handle(&self, event: &ChangeEvent, engine: &SyncEngine<'_>) -> Option<SyncReport> {
        let name = match self.classifier.template_name(&event.path) {
            Ok(name) => name,
            Err(e) => {
                debug!("Skipping {}: {e}", event.path.display());
                return None;
            }
        };

        if PathClassifier::is_reserved(&name) || is_noise(&name) {
            debug!("Skipping {name}");
            return None;
        }

        match event.kind {
            ChangeKind::Added | ChangeKind::Modified => {
                if event.path.is_dir() {
                    return None;
                }
                debug!("{:?} {name}", event.kind);
                Some(engine.push(&[name], PushMode::Watch))
            }
            ChangeKind::Deleted => {
                debug!("Deleted {name}");
                Some(engine.delete(&[name]))
            }
        }
    }
}

/// Whether `name` lives in a tooling directory or is an editor temp file
#[must_use]
pub fn is_noise(name: &str) -> bool {
    if name.split('/').any(|segment| IGNORED_DIRS.contains(&segment)) {
        return true;
    }

    let file = name.rsplit('/').next().unwrap_or(name);
    if file.ends_with('~') {
        return true;
    }
    if file.contains(".___jb_") && file.ends_with("___") {
        return true;
    }

    // Swap files (.swp, .swo, ...) and compiled python
    file.rsplit_once('.').is_some_and(|(_, ext)| {
        (ext.len() == 3 && ext.starts_with("sw")) || matches!(ext, "pyc" | "pyo" | "pyd")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncTarget;
    use crate::gateway::{ApiResponse, MockGateway, Template};
    use mockall::predicate::eq;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |event, p| event.add_path(PathBuf::from(p)))
    }

    fn target() -> SyncTarget {
        SyncTarget {
            env: "development".to_string(),
            apikey: Some("secret".to_string()),
            store: Some("https://shop.example.com".to_string()),
            theme_id: Some(3),
            sass_source: None,
            sass_destination: "assets".to_string(),
            include: None,
        }
    }

    #[test]
    fn test_convert_basic_kinds() {
        assert_eq!(
            convert_event(&event(EventKind::Create(CreateKind::File), &["/p/a.html"])),
            vec![ChangeEvent::new(ChangeKind::Added, "/p/a.html")]
        );
        assert_eq!(
            convert_event(&event(
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                &["/p/a.html"]
            )),
            vec![ChangeEvent::new(ChangeKind::Modified, "/p/a.html")]
        );
        assert_eq!(
            convert_event(&event(EventKind::Remove(RemoveKind::File), &["/p/a.html"])),
            vec![ChangeEvent::new(ChangeKind::Deleted, "/p/a.html")]
        );
    }

    #[test]
    fn test_convert_rename_splits() {
        let converted = convert_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/p/old.html", "/p/new.html"],
        ));
        assert_eq!(
            converted,
            vec![
                ChangeEvent::new(ChangeKind::Deleted, "/p/old.html"),
                ChangeEvent::new(ChangeKind::Added, "/p/new.html"),
            ]
        );

        assert_eq!(
            convert_event(&event(
                EventKind::Modify(ModifyKind::Name(RenameMode::From)),
                &["/p/old.html"]
            )),
            vec![ChangeEvent::new(ChangeKind::Deleted, "/p/old.html")]
        );
    }

    #[test]
    fn test_convert_ignores_access_and_metadata() {
        assert!(
            convert_event(&event(EventKind::Access(AccessKind::Any), &["/p/a.html"])).is_empty()
        );
        assert!(
            convert_event(&event(
                EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)),
                &["/p/a.html"]
            ))
            .is_empty()
        );
    }

    #[test]
    fn test_run_dispatches_push_and_delete() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("templates")).unwrap();
        fs::write(root.join("templates/index.html"), "<h1>new</h1>").unwrap();

        let mut gateway = MockGateway::new();
        gateway
            .expect_create_or_update_template()
            .withf(|_, template: &Template| {
                template.name == "templates/index.html"
                    && template.content() == Some("<h1>new</h1>")
            })
            .times(1)
            .returning(|_, _| Ok(ApiResponse::new(200, json!({}))));
        gateway
            .expect_delete_template()
            .with(eq(3_u64), eq("templates/old.html"))
            .times(1)
            .returning(|_, _| Ok(ApiResponse::new(204, json!(null))));

        let target = target();
        let classifier = PathClassifier::new(root, None);
        let engine = SyncEngine::new(&gateway, &target, &classifier);

        let batches = vec![
            vec![ChangeEvent::new(
                ChangeKind::Modified,
                root.join("templates/index.html"),
            )],
            vec![ChangeEvent::new(
                ChangeKind::Deleted,
                root.join("templates/old.html"),
            )],
        ];

        ChangeWatcher::new(&classifier).run(batches, &engine);
    }

    #[test]
    fn test_reserved_and_directories_are_discarded() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("templates")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join("config.yml"), "development: {}").unwrap();
        fs::write(root.join("build.py"), "").unwrap();

        let mut gateway = MockGateway::new();
        gateway.expect_create_or_update_template().never();
        gateway.expect_delete_template().never();

        let target = target();
        let classifier = PathClassifier::new(root, None);
        let engine = SyncEngine::new(&gateway, &target, &classifier);
        let watcher = ChangeWatcher::new(&classifier);

        for event in [
            ChangeEvent::new(ChangeKind::Modified, root.join("config.yml")),
            ChangeEvent::new(ChangeKind::Added, root.join("build.py")),
            ChangeEvent::new(ChangeKind::Modified, root.join(".git/index")),
            ChangeEvent::new(ChangeKind::Deleted, root.join(".git/ORIG_HEAD")),
            ChangeEvent::new(ChangeKind::Added, root.join("templates")),
            ChangeEvent::new(ChangeKind::Modified, "/somewhere/else.html"),
            ChangeEvent::new(ChangeKind::Added, root.join("node_modules/lodash/index.js")),
            ChangeEvent::new(ChangeKind::Deleted, root.join("assets/node_modules/x.js")),
            ChangeEvent::new(ChangeKind::Added, root.join("__pycache__/build.cpython-312.pyc")),
            ChangeEvent::new(ChangeKind::Modified, root.join("site-packages/pkg/mod.txt")),
            ChangeEvent::new(ChangeKind::Modified, root.join(".idea/workspace.xml")),
            ChangeEvent::new(ChangeKind::Added, root.join("templates/index.html~")),
            ChangeEvent::new(ChangeKind::Added, root.join("templates/.index.html.swp")),
            ChangeEvent::new(ChangeKind::Deleted, root.join("templates/index.html.swo")),
            ChangeEvent::new(
                ChangeKind::Added,
                root.join("templates/index.html.___jb_tmp___"),
            ),
        ] {
            assert!(watcher.handle(&event, &engine).is_none(), "{event:?}");
        }
    }

    #[test]
    fn test_noise_rules_keep_real_templates() {
        for name in [
            "templates/index.html",
            "assets/app.js",
            "snippets/swatch.liquid",
            "assets/logo.svg",
            "locales/en.json",
        ] {
            assert!(!is_noise(name), "{name}");
        }

        for name in [
            "node_modules/a.js",
            "templates/index.html~",
            "templates/index.html.swp",
            "templates/index.html.___jb_old___",
            "scripts/tool.pyc",
        ] {
            assert!(is_noise(name), "{name}");
        }
    }

    #[test]
    fn test_watch_batches_closes_with_handle() {
        let tmp = TempDir::new().unwrap();
        let (handle, rx) = watch_batches(tmp.path(), Duration::from_millis(50)).unwrap();
        drop(handle);
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
    }
}
