//! # themesync
//!
//! Core library for synchronizing a local theme directory with a remote
//! theme store.
//!
//! This library provides configuration resolution, template discovery and
//! classification, the store gateway, one-shot push/pull/delete and the
//! filesystem watcher behind continuous sync.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Style-sheet compilation
pub mod assets;

/// Path normalization and classification
pub mod classifier;

/// Configuration file resolution and persistence
pub mod config;

/// Error types
pub mod error;

/// Remote theme store access
pub mod gateway;

/// Local template discovery
pub mod scanner;

/// Push, pull and delete against the store
pub mod sync;

/// Filesystem watching
pub mod watch;
