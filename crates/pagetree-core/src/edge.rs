//! Parent-link projection.
//!
//! Edges are never stored. [`project_edges`] derives them from the pages'
//! `parent_id` fields every time they are needed, so the edge list can never
//! drift from the hierarchy.

use std::collections::HashSet;

use serde::Serialize;

use crate::{identifier::PageId, page::PageNode};

/// A directed parent → child edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    id: String,
    source: PageId,
    target: PageId,
}

impl Edge {
    /// Creates the edge from `source` (parent) to `target` (child).
    ///
    /// The edge id is `"{source}-{target}"`.
    pub fn new(source: PageId, target: PageId) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
        }
    }

    /// Stable edge id, `"{source}-{target}"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parent page.
    pub fn source(&self) -> &PageId {
        &self.source
    }

    /// The child page.
    pub fn target(&self) -> &PageId {
        &self.target
    }

    /// Returns true when source and target are the same page.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Projects parent links into edges, in page order.
///
/// Exactly one edge is produced for every page whose `parent_id` names a page
/// present in `pages`. Dangling parent references produce nothing.
///
/// # Examples
///
/// ```
/// use pagetree_core::{edge::project_edges, page::PageNode};
///
/// let pages = vec![
///     PageNode::root("home", "Home"),
///     PageNode::child("about", "About", "home", 2),
///     PageNode::child("orphan", "Orphan", "missing", 2),
/// ];
///
/// let edges = project_edges(&pages);
/// assert_eq!(edges.len(), 1);
/// assert_eq!(edges[0].id(), "home-about");
/// ```
pub fn project_edges(pages: &[PageNode]) -> Vec<Edge> {
    let known: HashSet<&PageId> = pages.iter().map(PageNode::id).collect();

    pages
        .iter()
        .filter_map(|page| {
            let parent = page.parent_id()?;
            known
                .contains(parent)
                .then(|| Edge::new(parent.clone(), page.id().clone()))
        })
        .collect()
}
