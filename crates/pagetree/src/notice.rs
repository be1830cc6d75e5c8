//! User-facing outcome of save, load and export.
//!
//! Persistence never fails hard: storage and serialization problems are
//! logged and reported as a [`Notice`] the host shows to the user.

use std::fmt;

/// Result of an explicit Save, Load or Export command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The document was written to local storage.
    Saved,
    /// Writing to local storage failed; the in-memory document is intact.
    SaveFailed { reason: String },
    /// A stored document replaced the in-memory one.
    Loaded,
    /// Nothing usable was stored; the in-memory document is unchanged.
    NoSavedData,
    /// A download was offered under `file_name`.
    Exported { file_name: String },
    /// The export could not be produced or delivered.
    ExportFailed { reason: String },
}

impl Notice {
    /// Returns true for the failure variants.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::SaveFailed { .. } | Self::NoSavedData | Self::ExportFailed { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved => write!(f, "Saved to local storage"),
            Self::SaveFailed { reason } => write!(f, "Save failed: {reason}"),
            Self::Loaded => write!(f, "Loaded saved structure"),
            Self::NoSavedData => write!(f, "No saved data found"),
            Self::Exported { file_name } => write!(f, "Exported {file_name}"),
            Self::ExportFailed { reason } => write!(f, "Export failed: {reason}"),
        }
    }
}
