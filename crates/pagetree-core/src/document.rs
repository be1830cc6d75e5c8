//! The page-structure document.
//!
//! A [`Document`] is the unit that is saved, loaded and exported: the list of
//! pages plus the ordered home-page sections. It serializes to
//!
//! ```json
//! { "nodes": [ { "id": "home", "label": "Home", "parentId": null,
//!                "level": 1, "position": { "x": 0.0, "y": 0.0 } } ],
//!   "sections": [ "Hero", "Footer" ] }
//! ```
//!
//! Field order is fixed, so serializing the same document twice yields the
//! same bytes.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{geometry::Point, identifier::PageId, page::PageNode};

/// Page hierarchy and home-section order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<PageNode>,
    sections: Vec<String>,
}

impl Document {
    /// Creates a document from pages and sections.
    pub fn new(nodes: Vec<PageNode>, sections: Vec<String>) -> Self {
        Self { nodes, sections }
    }

    /// All pages in document order.
    pub fn nodes(&self) -> &[PageNode] {
        &self.nodes
    }

    /// Home-page sections in render order.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Looks up a page by id.
    pub fn node(&self, id: &str) -> Option<&PageNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns true if a page with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Pages without a parent reference, in document order.
    pub fn roots(&self) -> impl Iterator<Item = &PageNode> {
        self.nodes.iter().filter(|node| node.is_root())
    }

    /// Direct children of `id`, in document order.
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PageNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.parent_id().is_some_and(|parent| parent == id))
    }

    /// The page that hosts the home sections: the first root, or the first
    /// page if every page has a parent reference.
    pub fn home(&self) -> Option<&PageNode> {
        self.roots().next().or_else(|| self.nodes.first())
    }

    /// Returns true when every page sits at the origin.
    ///
    /// Such a document has never been laid out (an empty document counts as
    /// well).
    pub fn is_unpositioned(&self) -> bool {
        self.nodes.iter().all(|node| node.position().is_zero())
    }

    /// Sets the stored position of page `id`.
    ///
    /// Unknown ids and non-finite positions are ignored; returns whether a
    /// page was updated.
    pub fn set_position(&mut self, id: &str, position: Point) -> bool {
        if !position.is_finite() {
            debug!(page_id = id; "Ignoring non-finite position");
            return false;
        }
        match self.nodes.iter_mut().find(|node| node.id() == id) {
            Some(node) => {
                node.set_position(position);
                true
            }
            None => {
                debug!(page_id = id; "Ignoring position for unknown page");
                false
            }
        }
    }

    /// Replaces the section list, returning the updated document.
    pub fn with_sections(mut self, sections: Vec<String>) -> Self {
        self.sections = sections;
        self
    }

    /// Replaces the page list, returning the updated document.
    pub fn with_nodes(mut self, nodes: Vec<PageNode>) -> Self {
        self.nodes = nodes;
        self
    }

    /// First page whose position has a NaN or infinite coordinate.
    ///
    /// JSON has no representation for such values, so a document holding one
    /// cannot be saved faithfully.
    pub fn non_finite_page(&self) -> Option<&PageNode> {
        self.nodes.iter().find(|node| !node.position().is_finite())
    }

    /// Overwrites positions for every page present in `positions`.
    ///
    /// Pages missing from the map keep their current position.
    pub fn apply_positions(&mut self, positions: &HashMap<PageId, Point>) {
        for node in &mut self.nodes {
            if let Some(&position) = positions.get(node.id()) {
                node.set_position(position);
            }
        }
    }

    /// Moves page `id` under `new_parent` (`None` makes it a root).
    ///
    /// The moved page gets `level = parent.level + 1` (1 for roots) and every
    /// descendant is renumbered from there. Positions are untouched.
    ///
    /// Returns false and leaves the document unchanged when `id` is unknown,
    /// `new_parent` is unknown, or `new_parent` is `id` itself or one of its
    /// descendants.
    pub fn reparent(&mut self, id: &str, new_parent: Option<&str>) -> bool {
        if !self.contains(id) {
            debug!(page_id = id; "Ignoring reparent of unknown page");
            return false;
        }

        let level = match new_parent {
            Some(parent) => {
                let Some(parent_node) = self.node(parent) else {
                    debug!(page_id = id, parent_id = parent; "Ignoring reparent under unknown page");
                    return false;
                };
                if parent == id || self.is_ancestor(id, parent) {
                    debug!(page_id = id, parent_id = parent; "Ignoring reparent that would form a cycle");
                    return false;
                }
                parent_node.level() + 1
            }
            None => 1,
        };

        let mut levels: HashMap<PageId, u32> = HashMap::new();
        levels.insert(PageId::new(id), level);
        let mut queue = VecDeque::from([PageId::new(id)]);
        let mut seen = HashSet::from([PageId::new(id)]);
        while let Some(current) = queue.pop_front() {
            let child_level = levels[&current] + 1;
            for child in self.children(current.as_str()) {
                if seen.insert(child.id().clone()) {
                    levels.insert(child.id().clone(), child_level);
                    queue.push_back(child.id().clone());
                }
            }
        }

        for node in &mut self.nodes {
            if node.id() == id {
                node.set_parent(new_parent.map(PageId::from));
            }
            if let Some(&level) = levels.get(node.id()) {
                node.set_level(level);
            }
        }
        true
    }

    /// Returns true when `ancestor` appears on the parent chain of `id`.
    ///
    /// Stops at dangling references and at chains that loop back on
    /// themselves.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = self.node(id).and_then(PageNode::parent_id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            if !visited.insert(parent) {
                return false;
            }
            current = self.node(parent.as_str()).and_then(PageNode::parent_id);
        }
        false
    }
}

impl Default for Document {
    /// The starter hierarchy shown on first launch.
    fn default() -> Self {
        let nodes = vec![
            PageNode::root("home", "Home"),
            PageNode::child("about", "About", "home", 2),
            PageNode::child("services", "Services", "home", 2),
            PageNode::child("blog", "Blog", "home", 2),
            PageNode::child("contact", "Contact", "home", 2),
            PageNode::child("service1", "Service Detail 1", "services", 3),
            PageNode::child("service2", "Service Detail 2", "services", 3),
            PageNode::child("post1", "Blog Post 1", "blog", 3),
            PageNode::child("post2", "Blog Post 2", "blog", 3),
            PageNode::child("author", "Author Page", "blog", 3),
            PageNode::child("location", "Location Info", "contact", 3),
            PageNode::child("support", "Support Page", "contact", 3),
        ];
        let sections = ["Hero", "Features", "Testimonials", "CTA", "Footer"]
            .into_iter()
            .map(String::from)
            .collect();

        Self::new(nodes, sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_shape() {
        let document = Document::default();
        assert_eq!(document.nodes().len(), 12);
        assert_eq!(
            document.sections(),
            ["Hero", "Features", "Testimonials", "CTA", "Footer"]
        );
        assert_eq!(document.home().map(|home| home.label()), Some("Home"));
        assert!(document.is_unpositioned());

        let blog_children: Vec<_> = document.children("blog").map(|p| p.label()).collect();
        assert_eq!(blog_children, ["Blog Post 1", "Blog Post 2", "Author Page"]);
    }

    #[test]
    fn test_set_position_updates_known_page() {
        let mut document = Document::default();
        assert!(document.set_position("about", Point::new(40.0, 60.0)));
        assert_eq!(
            document.node("about").map(PageNode::position),
            Some(Point::new(40.0, 60.0))
        );
        assert!(!document.is_unpositioned());
    }

    #[test]
    fn test_set_position_unknown_is_noop() {
        let mut document = Document::default();
        let before = document.clone();
        assert!(!document.set_position("pricing", Point::new(1.0, 1.0)));
        assert_eq!(document, before);
    }

    #[test]
    fn test_set_position_rejects_non_finite() {
        let mut document = Document::default();
        document.set_position("blog", Point::new(10.0, 10.0));
        let before = document.clone();

        for position in [
            Point::new(f64::NAN, 10.0),
            Point::new(10.0, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, 0.0),
        ] {
            assert!(!document.set_position("blog", position));
        }
        assert_eq!(document, before);
        assert!(document.non_finite_page().is_none());
    }

    #[test]
    fn test_non_finite_page_found() {
        let document = Document::new(
            vec![
                PageNode::root("home", "Home"),
                PageNode::child("a", "A", "home", 2).with_position(Point::new(f64::NAN, 1.0)),
            ],
            Vec::new(),
        );
        assert_eq!(document.non_finite_page().map(|p| p.id().as_str()), Some("a"));
    }

    #[test]
    fn test_empty_document_is_unpositioned() {
        assert!(Document::new(Vec::new(), Vec::new()).is_unpositioned());
    }

    #[test]
    fn test_home_falls_back_to_first_page() {
        let document = Document::new(
            vec![
                PageNode::child("a", "A", "b", 2),
                PageNode::child("b", "B", "a", 2),
            ],
            Vec::new(),
        );
        assert_eq!(document.home().map(|p| p.id().as_str()), Some("a"));
    }

    #[test]
    fn test_reparent_renumbers_subtree() {
        let mut document = Document::default();
        assert!(document.reparent("blog", Some("about")));

        let blog = document.node("blog").unwrap();
        assert_eq!(blog.parent_id().map(PageId::as_str), Some("about"));
        assert_eq!(blog.level(), 3);
        assert_eq!(document.node("post1").unwrap().level(), 4);
        assert_eq!(document.node("author").unwrap().level(), 4);
        assert_eq!(document.node("services").unwrap().level(), 2);
    }

    #[test]
    fn test_reparent_to_root() {
        let mut document = Document::default();
        assert!(document.reparent("contact", None));
        assert!(document.node("contact").unwrap().is_root());
        assert_eq!(document.node("contact").unwrap().level(), 1);
        assert_eq!(document.node("support").unwrap().level(), 2);
    }

    #[test]
    fn test_reparent_rejects_cycles_and_unknowns() {
        let mut document = Document::default();
        let before = document.clone();

        assert!(!document.reparent("blog", Some("post1")));
        assert!(!document.reparent("blog", Some("blog")));
        assert!(!document.reparent("blog", Some("pricing")));
        assert!(!document.reparent("pricing", Some("home")));
        assert_eq!(document, before);
    }

    #[test]
    fn test_is_ancestor_terminates_on_loops() {
        let document = Document::new(
            vec![
                PageNode::child("a", "A", "b", 2),
                PageNode::child("b", "B", "a", 2),
            ],
            Vec::new(),
        );
        assert!(document.is_ancestor("b", "a"));
        assert!(!document.is_ancestor("c", "a"));
    }

    #[test]
    fn test_apply_positions_keeps_missing_pages() {
        let mut document = Document::default();
        let positions = HashMap::from([(PageId::new("home"), Point::new(5.0, 6.0))]);
        document.apply_positions(&positions);
        assert_eq!(document.node("home").unwrap().position(), Point::new(5.0, 6.0));
        assert!(document.node("about").unwrap().position().is_zero());
    }

    #[test]
    fn test_json_shape() {
        let document = Document::new(
            vec![PageNode::root("home", "Home")],
            vec!["Hero".to_string()],
        );
        let json = serde_json::to_string(&document).unwrap();
        assert_eq!(
            json,
            r#"{"nodes":[{"id":"home","label":"Home","parentId":null,"level":1,"position":{"x":0.0,"y":0.0}}],"sections":["Hero"]}"#
        );
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, document);
    }
}
