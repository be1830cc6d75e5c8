//! Error adapter for converting PagetreeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Every variant gets
//! a stable diagnostic code; storage and configuration problems also carry a
//! hint on how to fix them.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use pagetree::{PagetreeError, persist::StorageError};

/// Adapter for [`PagetreeError`] values.
pub struct ErrorAdapter<'a>(pub &'a PagetreeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PagetreeError::Io(_) => "pagetree::io",
            PagetreeError::Storage(_) => "pagetree::storage",
            PagetreeError::Serialize(_) => "pagetree::serialize",
            PagetreeError::Layout(_) => "pagetree::layout",
            PagetreeError::Config(_) => "pagetree::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            PagetreeError::Storage(StorageError::QuotaExceeded { .. }) => {
                "raise `storage.quota_bytes` in the configuration file"
            }
            PagetreeError::Storage(StorageError::Unavailable { .. }) => {
                "check that the storage directory is writable, or pass --storage-dir"
            }
            PagetreeError::Config(_) => {
                "check the configuration file passed with --config or found in pagetree/config.toml"
            }
            PagetreeError::Serialize(_) => {
                "event scripts are JSON arrays of objects tagged by \"type\""
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a [`PagetreeError`] into a list of reportable errors.
///
/// Every error currently renders as a single report.
pub fn to_reportables(err: &PagetreeError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}
