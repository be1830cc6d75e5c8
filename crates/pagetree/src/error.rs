//! Error types for Pagetree operations.
//!
//! This module provides the main error type [`PagetreeError`]. Most editor
//! operations never surface it: unknown ids are no-ops and persistence
//! failures become [`Notice`](crate::notice::Notice)s. It is returned by the
//! layout engines, by the storage backends, and by hosts that need a hard
//! failure (reading an event script, loading configuration).

use std::io;

use thiserror::Error;

use crate::persist::StorageError;

/// The main error type for Pagetree operations.
#[derive(Debug, Error)]
pub enum PagetreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
