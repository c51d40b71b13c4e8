//! Synchronization engine
//!
//! Push, pull and delete against the remote store. Every batch operation
//! processes items one at a time and records per-item outcomes; a failing
//! item never stops the rest of the batch.

mod engine;
mod progress;
mod reporting;


use std::fmt;

pub use engine::{DEFAULT_WRITE_DELAY, SyncEngine};
pub use reporting::SyncReporter;

/// How a push was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// One-shot command over a batch of names
    Batch,
    /// Single file changed while watching
    Watch,
}

/// Batch operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Local to remote upload
    Push,
    /// Remote to local download
    Pull,
    /// Remote removal
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => f.write_str("push"),
            Self::Pull => f.write_str("pull"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Outcome of a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    /// Uploaded, written or deleted
    Synced,
    /// Style tree compiled instead of uploading the item
    Compiled,
    /// Failed with a message
    Failed(String),
}

/// A template name with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Template name
    pub name: String,
    /// Outcome
    pub status: ItemStatus,
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ItemStatus::Synced => write!(f, "{} -> ok", self.name),
            ItemStatus::Compiled => write!(f, "{} -> compiled", self.name),
            ItemStatus::Failed(message) => write!(f, "{} -> {message}", self.name),
        }
    }
}

/// Per-item results of one batch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Operation the report belongs to
    pub operation: Operation,
    /// Outcomes in processing order
    pub items: Vec<ItemOutcome>,
}

impl SyncReport {
    /// Empty report for an operation
    #[must_use]
    pub const fn new(operation: Operation) -> Self {
        Self {
            operation,
            items: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, name: impl Into<String>, status: ItemStatus) {
        self.items.push(ItemOutcome {
            name: name.into(),
            status,
        });
    }

    pub(crate) fn synced(&mut self, name: impl Into<String>) {
        self.record(name, ItemStatus::Synced);
    }

    pub(crate) fn failed(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.record(name, ItemStatus::Failed(message.into()));
    }

    /// Number of items synced
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Synced))
    }

    /// Number of items handled by compiling the style tree
    #[must_use]
    pub fn compiled(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Compiled))
    }

    /// Failed items
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items
            .iter()
            .filter(|item| matches!(item.status, ItemStatus::Failed(_)))
    }

    /// Outcome recorded for `name`, if any
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ItemStatus> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .map(|item| &item.status)
    }

    /// Whether no item failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    fn count(&self, predicate: impl Fn(&ItemStatus) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(&item.status)).count()
    }
}
