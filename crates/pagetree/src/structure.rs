//! Hierarchy graph built from a document's parent links.
//!
//! [`HierarchyGraph`] is the input the layout engines consume and the basis
//! of the structural report. It is rebuilt from the [`Document`] every time
//! it is needed and never stored.
//!
//! Pages are inserted in id order and edges in `(source, target)` order, so
//! everything derived from the graph is independent of the order pages
//! appear in the document. Self-loops are dropped; dangling parent links
//! never produce an edge in the first place.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use petgraph::{
    Direction,
    algo::{is_cyclic_directed, tarjan_scc},
    graph::{DiGraph, NodeIndex},
    unionfind::UnionFind,
};

use pagetree_core::{
    document::Document,
    edge::{Edge, project_edges},
    identifier::PageId,
};

/// Directed parent → child graph over a document's pages.
#[derive(Debug)]
pub struct HierarchyGraph {
    graph: DiGraph<PageId, ()>,
    indices: IndexMap<PageId, NodeIndex>,
}

impl HierarchyGraph {
    /// Builds the graph for `document`.
    pub fn from_document(document: &Document) -> Self {
        let mut ids: Vec<PageId> = document.nodes().iter().map(|n| n.id().clone()).collect();
        ids.sort();
        ids.dedup();

        let mut graph = DiGraph::with_capacity(ids.len(), ids.len());
        let mut indices = IndexMap::with_capacity(ids.len());
        for id in ids {
            let index = graph.add_node(id.clone());
            indices.insert(id, index);
        }

        let mut edges: Vec<Edge> = project_edges(document.nodes())
            .into_iter()
            .filter(|edge| !edge.is_self_loop())
            .collect();
        edges.sort_by(|a, b| (a.source(), a.target()).cmp(&(b.source(), b.target())));
        edges.dedup();

        for edge in &edges {
            if let (Some(&source), Some(&target)) =
                (indices.get(edge.source()), indices.get(edge.target()))
            {
                graph.add_edge(source, target, ());
            }
        }

        Self { graph, indices }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Page ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &PageId> {
        self.indices.keys()
    }

    /// Dense index of `id` in sorted order.
    pub fn index_of(&self, id: &PageId) -> Option<usize> {
        self.indices.get_index_of(id)
    }

    /// Page id at a dense index.
    pub fn id_at(&self, index: usize) -> Option<&PageId> {
        self.indices.get_index(index).map(|(id, _)| id)
    }

    /// Edges as pairs of dense indices, in `(source, target)` order.
    pub fn index_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(source, target)| (source.index(), target.index()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Children of `id`, sorted by id.
    pub fn children(&self, id: &PageId) -> Vec<&PageId> {
        let Some(&index) = self.indices.get(id) else {
            return Vec::new();
        };
        let mut children: Vec<&PageId> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|child| &self.graph[child])
            .collect();
        children.sort();
        children
    }

    /// Pages without an incoming edge, sorted by id.
    ///
    /// Includes pages whose parent link dangles.
    pub fn roots(&self) -> Vec<&PageId> {
        self.indices
            .iter()
            .filter(|&(_, &index)| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns true when parent links form a cycle.
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Groups of pages whose parent links loop back on each other.
    pub fn cycles(&self) -> Vec<Vec<PageId>> {
        let mut cycles: Vec<Vec<PageId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut ids: Vec<PageId> = component
                    .into_iter()
                    .map(|index| self.graph[index].clone())
                    .collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Weakly connected components as sorted dense indices, ordered by their
    /// smallest member.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut union_find = UnionFind::<usize>::new(self.node_count());
        for (source, target) in self.index_edges() {
            union_find.union(source, target);
        }

        let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for (index, label) in union_find.into_labeling().into_iter().enumerate() {
            groups.entry(label).or_default().push(index);
        }
        let mut components: Vec<Vec<usize>> = groups.into_values().collect();
        components.sort_by_key(|component| component[0]);
        components
    }

    /// Depth of every page reachable from a root (roots are level 1).
    ///
    /// Pages that only hang off a cycle are missing from the result.
    pub fn derived_levels(&self) -> HashMap<PageId, u32> {
        let mut levels = HashMap::with_capacity(self.node_count());
        let mut queue = VecDeque::new();
        for root in self.roots() {
            levels.insert(root.clone(), 1);
            queue.push_back(root.clone());
        }

        while let Some(id) = queue.pop_front() {
            let level = levels[&id] + 1;
            for child in self.children(&id) {
                if !levels.contains_key(child) {
                    levels.insert(child.clone(), level);
                    queue.push_back(child.clone());
                }
            }
        }
        levels
    }
}
