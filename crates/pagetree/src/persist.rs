//! Persistence adapter.
//!
//! [`Persistence`] saves the [`Document`] under [`STORAGE_KEY`] in a
//! [`Storage`] backend, loads it back, and exports it as a download.
//!
//! Saved text is compact JSON; exported text is the same document pretty
//! printed with two-space indentation. Nothing here fails hard: storage or
//! serialization problems are logged and reported as a [`Notice`].

mod export;
mod legacy;
mod storage;

pub use export::{DirectorySink, Download, DownloadSink, JSON_MIME_TYPE, MemorySink};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use log::{debug, error, info, warn};

use pagetree_core::document::Document;

use crate::{config::ExportConfig, notice::Notice};

/// Local storage key holding the saved document.
pub const STORAGE_KEY: &str = "page-editor-data";

/// Saves, loads and exports documents through a [`Storage`] backend.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    storage: S,
    export_file_name: String,
}

impl<S: Storage> Persistence<S> {
    /// Creates an adapter over `storage` exporting to the default file name.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            export_file_name: ExportConfig::default().file_name().to_string(),
        }
    }

    /// Uses the export settings from `config`.
    pub fn with_export_config(mut self, config: &ExportConfig) -> Self {
        self.export_file_name = config.file_name().to_string();
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn export_file_name(&self) -> &str {
        &self.export_file_name
    }

    /// Writes `document` to storage.
    ///
    /// Returns [`Notice::Saved`], or [`Notice::SaveFailed`] when the document
    /// could not be serialized or stored. The previously stored value is kept
    /// on failure.
    pub fn save(&mut self, document: &Document) -> Notice {
        if let Some(reason) = unserializable(document) {
            error!(reason = reason.as_str(); "Refusing to save document");
            return Notice::SaveFailed { reason };
        }
        let text = match serde_json::to_string(document) {
            Ok(text) => text,
            Err(err) => {
                error!(err:% = err; "Failed to serialize document");
                return Notice::SaveFailed {
                    reason: err.to_string(),
                };
            }
        };

        match self.storage.set_item(STORAGE_KEY, &text) {
            Ok(()) => {
                info!(pages = document.nodes().len(), bytes = text.len(); "Document saved");
                Notice::Saved
            }
            Err(err) => {
                error!(err:% = err; "Failed to save document");
                Notice::SaveFailed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Reads the saved document.
    ///
    /// Returns `None` when nothing is stored, the backend cannot be read, or
    /// the stored text is not a document in any accepted shape.
    pub fn load(&self) -> Option<Document> {
        let text = match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(key = STORAGE_KEY; "No saved document");
                return None;
            }
            Err(err) => {
                error!(err:% = err; "Failed to read saved document");
                return None;
            }
        };

        match legacy::parse(&text) {
            Ok(document) => {
                info!(pages = document.nodes().len(); "Document loaded");
                Some(document)
            }
            Err(err) => {
                warn!(err:% = err; "Ignoring unreadable saved document");
                None
            }
        }
    }

    /// Removes the saved document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove_item(STORAGE_KEY)?;
        info!(key = STORAGE_KEY; "Saved document cleared");
        Ok(())
    }

    /// Offers `document` as a pretty-printed JSON download.
    ///
    /// Returns [`Notice::Exported`], or [`Notice::ExportFailed`] when the
    /// document could not be serialized or the sink refused it.
    pub fn export(&self, document: &Document, sink: &mut impl DownloadSink) -> Notice {
        if let Some(reason) = unserializable(document) {
            error!(reason = reason.as_str(); "Refusing to export document");
            return Notice::ExportFailed { reason };
        }
        let text = match serde_json::to_string_pretty(document) {
            Ok(text) => text,
            Err(err) => {
                error!(err:% = err; "Failed to serialize export");
                return Notice::ExportFailed {
                    reason: err.to_string(),
                };
            }
        };

        match sink.offer(Download::json(self.export_file_name.as_str(), text)) {
            Ok(()) => Notice::Exported {
                file_name: self.export_file_name.clone(),
            },
            Err(err) => {
                error!(err:% = err; "Failed to deliver export");
                Notice::ExportFailed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Why `document` cannot round-trip through JSON, if it cannot.
///
/// serde_json writes NaN and infinities as `null`, which would not load back.
fn unserializable(document: &Document) -> Option<String> {
    document
        .non_finite_page()
        .map(|page| format!("page {} has a non-finite position", page.id()))
}
