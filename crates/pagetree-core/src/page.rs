//! The page record stored in a [`Document`](crate::document::Document).

use serde::{Deserialize, Serialize};

use crate::{geometry::Point, identifier::PageId};

/// A single page in the site hierarchy.
///
/// `level` is presentation metadata (root = 1). Nothing recomputes it when
/// positions change or documents load; it only tracks `parent_id` through
/// operations that re-parent a page.
///
/// # Examples
///
/// ```
/// use pagetree_core::page::PageNode;
///
/// let home = PageNode::root("home", "Home");
/// let about = PageNode::child("about", "About", "home", 2);
///
/// assert!(home.is_root());
/// assert_eq!(about.parent_id().map(|p| p.as_str()), Some("home"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNode {
    id: PageId,
    label: String,
    #[serde(rename = "parentId", default)]
    parent_id: Option<PageId>,
    level: u32,
    #[serde(default)]
    position: Point,
}

impl PageNode {
    /// Creates a page with every field given explicitly.
    pub fn new(
        id: impl Into<PageId>,
        label: impl Into<String>,
        parent_id: Option<PageId>,
        level: u32,
        position: Point,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent_id,
            level,
            position,
        }
    }

    /// Creates a root page at level 1, positioned at the origin.
    pub fn root(id: impl Into<PageId>, label: impl Into<String>) -> Self {
        Self::new(id, label, None, 1, Point::default())
    }

    /// Creates a child page positioned at the origin.
    pub fn child(
        id: impl Into<PageId>,
        label: impl Into<String>,
        parent_id: impl Into<PageId>,
        level: u32,
    ) -> Self {
        Self::new(id, label, Some(parent_id.into()), level, Point::default())
    }

    pub fn id(&self) -> &PageId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the parent id, `None` for roots.
    ///
    /// The referenced page is not guaranteed to exist.
    pub fn parent_id(&self) -> Option<&PageId> {
        self.parent_id.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns true when the page has no parent reference at all.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns a copy of this page with a new position.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_parent(&mut self, parent_id: Option<PageId>) {
        self.parent_id = parent_id;
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_serializes_null_parent() {
        let page = PageNode::root("home", "Home");
        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(
            json,
            r#"{"id":"home","label":"Home","parentId":null,"level":1,"position":{"x":0.0,"y":0.0}}"#
        );
    }

    #[test]
    fn test_missing_parent_and_position_default() {
        let page: PageNode =
            serde_json::from_str(r#"{"id":"blog","label":"Blog","level":2}"#).unwrap();
        assert!(page.is_root());
        assert!(page.position().is_zero());
    }

    #[test]
    fn test_with_position() {
        let page = PageNode::child("post1", "Blog Post 1", "blog", 3)
            .with_position(Point::new(12.0, 34.0));
        assert_eq!(page.position(), Point::new(12.0, 34.0));
        assert_eq!(page.level(), 3);
    }
}
