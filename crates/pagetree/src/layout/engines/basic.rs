//! Basic tidy-tree layout engine.
//!
//! Leaves are packed left to right in id order and every parent is centered
//! over its first and last child. Ranks are depths from the component's
//! root. Pages caught in a parent cycle are walked from their smallest id,
//! so every page ends up with a slot.

use log::debug;

use crate::{error::PagetreeError, structure::HierarchyGraph};

use super::{HierarchyEngine, Placement, Slot, pack_components};

/// The basic layout engine.
pub struct Engine;

impl Engine {
    /// Create a new basic layout engine
    pub fn new() -> Self {
        Self
    }
}

/// Depth-first walk state for one component.
struct Walk<'g> {
    graph: &'g HierarchyGraph,
    visited: Vec<bool>,
    next_leaf: f64,
    slots: Vec<(usize, Slot)>,
}

/// A page whose children are still being placed.
struct Frame {
    index: usize,
    rank: usize,
    children: Vec<usize>,
    next_child: usize,
    child_offsets: Vec<f64>,
}

impl Walk<'_> {
    /// Places `root` and its unvisited subtree.
    ///
    /// Uses an explicit stack so hierarchy depth does not grow the call stack.
    fn place(&mut self, root: usize) {
        self.visited[root] = true;
        let mut stack = vec![self.frame(root, 0)];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.children.get(frame.next_child) {
                frame.next_child += 1;
                let rank = frame.rank + 1;
                if !self.visited[child] {
                    self.visited[child] = true;
                    stack.push(self.frame(child, rank));
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            let offset = match (done.child_offsets.first(), done.child_offsets.last()) {
                (Some(first), Some(last)) => (first + last) / 2.0,
                _ => {
                    let offset = self.next_leaf;
                    self.next_leaf += 1.0;
                    offset
                }
            };
            self.slots.push((done.index, Slot::new(done.rank, offset)));
            if let Some(parent) = stack.last_mut() {
                parent.child_offsets.push(offset);
            }
        }
    }

    fn frame(&self, index: usize, rank: usize) -> Frame {
        let children = match self.graph.id_at(index) {
            Some(id) => self
                .graph
                .children(id)
                .into_iter()
                .filter_map(|child| self.graph.index_of(child))
                .collect(),
            None => Vec::new(),
        };
        Frame {
            index,
            rank,
            children,
            next_child: 0,
            child_offsets: Vec::new(),
        }
    }
}

impl HierarchyEngine for Engine {
    fn place(&self, graph: &HierarchyGraph) -> Result<Placement, PagetreeError> {
        let len = graph.node_count();
        let roots: Vec<usize> = graph
            .roots()
            .into_iter()
            .filter_map(|id| graph.index_of(id))
            .collect();

        let mut walk = Walk {
            graph,
            visited: vec![false; len],
            next_leaf: 0.0,
            slots: Vec::new(),
        };

        let mut components = Vec::new();
        for start in roots.into_iter().chain(0..len) {
            if walk.visited[start] {
                continue;
            }
            walk.next_leaf = 0.0;
            walk.place(start);
            components.push(std::mem::take(&mut walk.slots));
        }

        debug!(components_count = components.len(); "Basic layout placed components");
        pack_components(len, components)
    }
}

#[cfg(test)]
mod tests {
    use pagetree_core::{document::Document, identifier::PageId, page::PageNode};

    use super::*;

    fn slot(graph: &HierarchyGraph, placement: &Placement, id: &str) -> Slot {
        let index = graph.index_of(&PageId::new(id)).unwrap();
        placement.slot(index).unwrap()
    }

    #[test]
    fn test_parents_centered_over_children() {
        let graph = HierarchyGraph::from_document(&Document::default());
        let placement = Engine::new().place(&graph).unwrap();

        // Home's children in id order: about, blog, contact, services.
        assert_eq!(slot(&graph, &placement, "about"), Slot::new(1, 0.0));
        assert_eq!(slot(&graph, &placement, "author"), Slot::new(2, 1.0));
        assert_eq!(slot(&graph, &placement, "post1"), Slot::new(2, 2.0));
        assert_eq!(slot(&graph, &placement, "post2"), Slot::new(2, 3.0));
        assert_eq!(slot(&graph, &placement, "blog"), Slot::new(1, 2.0));
        assert_eq!(slot(&graph, &placement, "contact"), Slot::new(1, 4.5));
        assert_eq!(slot(&graph, &placement, "services"), Slot::new(1, 6.5));
        assert_eq!(slot(&graph, &placement, "home"), Slot::new(0, 3.25));
    }

    #[test]
    fn test_cycle_members_are_placed() {
        let document = Document::new(
            vec![
                PageNode::child("a", "A", "b", 2),
                PageNode::child("b", "B", "a", 2),
            ],
            Vec::new(),
        );
        let graph = HierarchyGraph::from_document(&document);
        let placement = Engine::new().place(&graph).unwrap();

        assert_eq!(slot(&graph, &placement, "a"), Slot::new(0, 0.0));
        assert_eq!(slot(&graph, &placement, "b"), Slot::new(1, 0.0));
    }

    #[test]
    fn test_deep_chain_is_placed() {
        let depth = 100_000;
        let mut nodes = vec![PageNode::root("p0", "Page 0")];
        nodes.extend((1..depth).map(|i| {
            PageNode::child(format!("p{i}"), format!("Page {i}"), format!("p{}", i - 1), 2)
        }));
        let graph = HierarchyGraph::from_document(&Document::new(nodes, Vec::new()));
        let placement = Engine::new().place(&graph).unwrap();

        assert_eq!(slot(&graph, &placement, "p0"), Slot::new(0, 0.0));
        let last = format!("p{}", depth - 1);
        assert_eq!(slot(&graph, &placement, &last), Slot::new(depth - 1, 0.0));
    }

    #[test]
    fn test_empty_graph() {
        let graph = HierarchyGraph::from_document(&Document::new(Vec::new(), Vec::new()));
        let placement = Engine::new().place(&graph).unwrap();
        assert_eq!(placement.slot(0), None);
    }
}
