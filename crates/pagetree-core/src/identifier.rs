//! Page identifiers.
//!
//! This module provides the [`PageId`] type. Identifiers are plain strings
//! chosen by whoever authored the document and must stay stable across
//! sessions, since they key positions, parent links and edge ids.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Stable identifier of a page in the hierarchy.
///
/// Serializes as a bare JSON string. Ordering is lexicographic on the
/// underlying string, which is what layout uses to stay independent of the
/// order pages were inserted in.
///
/// # Examples
///
/// ```
/// use pagetree_core::identifier::PageId;
///
/// let id = PageId::new("services");
/// assert_eq!(id, "services");
/// assert_eq!(id.to_string(), "services");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Creates a `PageId` from anything convertible into a `String`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PageId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PageId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_serializes_as_string() {
        let id = PageId::new("blog");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"blog\"");

        let back: PageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_page_id_ordering_is_lexicographic() {
        let mut ids = vec![
            PageId::new("services"),
            PageId::new("about"),
            PageId::new("home"),
        ];
        ids.sort();
        assert_eq!(ids, vec!["about", "home", "services"]);
    }
}
