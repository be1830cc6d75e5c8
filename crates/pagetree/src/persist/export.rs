//! Export downloads.
//!
//! An export produces a [`Download`] (file name, MIME type, contents) and
//! hands it to a [`DownloadSink`]. The sink decides what offering a download
//! means for the host: [`DirectorySink`] writes the file into a directory,
//! [`MemorySink`] keeps it for inspection.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::error::PagetreeError;

/// MIME type of exported documents.
pub const JSON_MIME_TYPE: &str = "application/json";

/// A file offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    file_name: String,
    mime_type: &'static str,
    contents: String,
}

impl Download {
    /// Creates a JSON download.
    pub fn json(file_name: impl Into<String>, contents: String) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: JSON_MIME_TYPE,
            contents,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Receives offered downloads.
pub trait DownloadSink {
    /// Delivers `download` to the user.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError`] if the download cannot be delivered.
    fn offer(&mut self, download: Download) -> Result<(), PagetreeError>;
}

/// Writes downloads into a directory, replacing files of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl DownloadSink for DirectorySink {
    fn offer(&mut self, download: Download) -> Result<(), PagetreeError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(download.file_name());
        fs::write(&path, download.contents())?;
        info!(
            path = path.display().to_string(),
            mime_type = download.mime_type(),
            bytes = download.contents().len();
            "Export written"
        );
        Ok(())
    }
}

/// Keeps downloads in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    downloads: Vec<Download>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downloads(&self) -> &[Download] {
        &self.downloads
    }

    /// The most recent download.
    pub fn last(&self) -> Option<&Download> {
        self.downloads.last()
    }
}

impl DownloadSink for MemorySink {
    fn offer(&mut self, download: Download) -> Result<(), PagetreeError> {
        self.downloads.push(download);
        Ok(())
    }
}
