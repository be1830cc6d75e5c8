//! Configuration types for the Pagetree editor.
//!
//! All types implement [`serde::Deserialize`] and fall back to defaults for
//! any field that is not set, so an empty configuration file is valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Engine, direction, node box size and spacing.
//! - [`StorageConfig`] - Where local storage lives and its quota.
//! - [`ExportConfig`] - File name and target directory for exports.
//!
//! # Example
//!
//! ```
//! # use pagetree::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.export().file_name(), "page-structure.json");
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use pagetree_core::{
    geometry::Size,
    options::{LayoutDirection, LayoutEngine},
};

use crate::error::PagetreeError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Local storage configuration section.
    #[serde(default)]
    storage: StorageConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, storage: StorageConfig, export: ExportConfig) -> Self {
        Self {
            layout,
            storage,
            export,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the storage configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    /// Overrides the storage directory.
    pub fn with_storage_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.storage.directory = Some(directory.into());
        self
    }

    /// Overrides the export directory.
    pub fn with_export_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.export.directory = Some(directory.into());
        self
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError::Config`] for non-positive node sizes,
    /// negative spacing or padding, or an empty export file name.
    pub fn validate(&self) -> Result<(), PagetreeError> {
        let layout = &self.layout;
        let positive = |value: f64| value.is_finite() && value > 0.0;
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;

        if !positive(layout.node_width) || !positive(layout.node_height) {
            return Err(PagetreeError::Config(format!(
                "node size must be positive, got {}x{}",
                layout.node_width, layout.node_height
            )));
        }
        if !non_negative(layout.node_spacing)
            || !non_negative(layout.rank_spacing)
            || !non_negative(layout.padding)
        {
            return Err(PagetreeError::Config(
                "spacing and padding must be non-negative".to_string(),
            ));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(PagetreeError::Config(
                "export file name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Layout engine configuration.
///
/// Defaults mirror the diagram renderer: 180×80 node boxes, 50 units between
/// siblings and between ranks, top-to-bottom.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// [`LayoutEngine`] used for initial layout and resets.
    engine: LayoutEngine,

    /// Default [`LayoutDirection`].
    direction: LayoutDirection,

    /// Width of a node box.
    node_width: f64,

    /// Height of a node box.
    node_height: f64,

    /// Gap between neighbouring nodes of the same rank.
    node_spacing: f64,

    /// Gap between consecutive ranks.
    rank_spacing: f64,

    /// Offset of the drawing from the origin.
    padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            direction: LayoutDirection::default(),
            node_width: 180.0,
            node_height: 80.0,
            node_spacing: 50.0,
            rank_spacing: 50.0,
            padding: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Returns a copy using `engine`.
    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Returns a copy using `direction`.
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Size of every node box.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn node_spacing(&self) -> f64 {
        self.node_spacing
    }

    pub fn rank_spacing(&self) -> f64 {
        self.rank_spacing
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding stored keys. Hosts pick a platform default when unset.
    #[serde(default)]
    directory: Option<PathBuf>,

    /// Maximum size of a stored value in bytes.
    #[serde(default)]
    quota_bytes: Option<usize>,
}

impl StorageConfig {
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn quota_bytes(&self) -> Option<usize> {
        self.quota_bytes
    }
}

/// Export configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name offered for the downloaded file.
    file_name: String,

    /// Directory downloads are written to; the working directory when unset.
    directory: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "page-structure.json".to_string(),
            directory: None,
        }
    }
}

impl ExportConfig {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}
