//! Sugiyama layout engine.
//!
//! Layered drawing of the hierarchy through the `rust-sugiyama` crate:
//! ranking, crossing minimization and coordinate assignment all happen in
//! the library. This module feeds it one connected component at a time,
//! reads the coordinates back and converts them into [`Slot`]s.
//!
//! `rust-sugiyama` reports a y coordinate per layer; the distinct values
//! become ranks, oriented so that parents come before their children.
//! x coordinates are divided by the narrowest gap between neighbours of a
//! rank to get slot offsets.

use log::debug;
use rust_sugiyama::configure::Config;

use crate::{error::PagetreeError, structure::HierarchyGraph};

use super::{HierarchyEngine, Placement, Slot, pack_components};

/// Separation `rust-sugiyama` keeps between neighbouring vertices.
const VERTEX_SPACING: f64 = 10.0;

/// Two layer coordinates closer than this are the same rank.
const RANK_EPSILON: f64 = 1e-6;

/// The Sugiyama layout engine.
pub struct Engine {
    vertex_spacing: f64,
}

impl Engine {
    /// Create a new Sugiyama layout engine
    pub fn new() -> Self {
        Self {
            vertex_spacing: VERTEX_SPACING,
        }
    }

    /// Lays out one connected component with at least one edge.
    ///
    /// `members` are dense indices sorted ascending; `edges` use the same
    /// dense indices.
    fn place_component(
        &self,
        members: &[usize],
        edges: &[(usize, usize)],
    ) -> Result<Vec<(usize, Slot)>, PagetreeError> {
        // rust-sugiyama wants contiguous ids, so renumber locally.
        let local = |index: usize| members.binary_search(&index).ok();
        let local_edges: Vec<(u32, u32)> = edges
            .iter()
            .filter_map(|&(source, target)| Some((local(source)? as u32, local(target)? as u32)))
            .collect();
        let orientation_edge = local_edges.first().copied();

        let vertex_spacing = self.vertex_spacing;
        let layouts = std::panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&local_edges, &config)
        })
        .map_err(|err| {
            let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                format!("rust-sugiyama layout engine panicked: {panic_msg}")
            } else if let Some(panic_msg) = err.downcast_ref::<&str>() {
                format!("rust-sugiyama layout engine panicked: {panic_msg}")
            } else {
                "rust-sugiyama layout engine panicked with unknown error".to_string()
            };
            PagetreeError::Layout(message)
        })?;

        // Coordinates per local id; ids past `members` are dummy vertices.
        let mut coords: Vec<Option<(f64, f64)>> = vec![None; members.len()];
        for (layout, _, _) in &layouts {
            for &(id, (x, y)) in layout {
                if let Some(entry) = coords.get_mut(id as usize) {
                    *entry = Some((x as f64, y as f64));
                }
            }
        }

        let mut located = Vec::with_capacity(members.len());
        for (local_id, coord) in coords.into_iter().enumerate() {
            let (x, y) = coord.ok_or_else(|| {
                PagetreeError::Layout(format!(
                    "rust-sugiyama returned no coordinates for page index {}",
                    members[local_id]
                ))
            })?;
            located.push((local_id, x, y));
        }

        // Ranks grow away from the roots whatever sign the library uses.
        let descending = orientation_edge.is_some_and(|(source, target)| {
            located[source as usize].2 > located[target as usize].2
        });
        let mut layers: Vec<f64> = located.iter().map(|&(_, _, y)| y).collect();
        layers.sort_by(f64::total_cmp);
        if descending {
            layers.reverse();
        }
        layers.dedup_by(|a, b| (*a - *b).abs() < RANK_EPSILON);

        let mut ranked = Vec::with_capacity(located.len());
        for (local_id, x, y) in located {
            let rank = layers
                .iter()
                .position(|layer| (layer - y).abs() < RANK_EPSILON)
                .ok_or_else(|| PagetreeError::Layout("Layer not found for coordinate".to_string()))?;
            ranked.push((local_id, rank, x));
        }

        let unit = self.slot_width(&ranked, layers.len());
        Ok(ranked
            .into_iter()
            .map(|(local_id, rank, x)| (members[local_id], Slot::new(rank, x / unit)))
            .collect())
    }

    /// Width of one slot in library coordinates.
    ///
    /// The smallest gap between neighbours of the same rank, so that no two
    /// pages of a rank end up less than one slot apart. Falls back to the
    /// vertex spacing when every rank holds a single page.
    fn slot_width(&self, ranked: &[(usize, usize, f64)], ranks: usize) -> f64 {
        let mut narrowest = f64::INFINITY;
        for rank in 0..ranks {
            let mut xs: Vec<f64> = ranked
                .iter()
                .filter(|&&(_, r, _)| r == rank)
                .map(|&(_, _, x)| x)
                .collect();
            xs.sort_by(f64::total_cmp);
            for pair in xs.windows(2) {
                let gap = pair[1] - pair[0];
                if gap > RANK_EPSILON {
                    narrowest = narrowest.min(gap);
                }
            }
        }

        if narrowest.is_finite() {
            narrowest
        } else {
            self.vertex_spacing
        }
    }
}

impl HierarchyEngine for Engine {
    fn place(&self, graph: &HierarchyGraph) -> Result<Placement, PagetreeError> {
        let edges = graph.index_edges();
        let components = graph.components();

        debug!(
            "Applying Sugiyama algorithm to graph with {} nodes, {} edges and {} components",
            graph.node_count(),
            edges.len(),
            components.len()
        );

        let mut placed: Vec<Vec<(usize, Slot)>> = Vec::with_capacity(components.len());
        for members in components {
            let component_edges: Vec<(usize, usize)> = edges
                .iter()
                .copied()
                .filter(|(source, _)| members.binary_search(source).is_ok())
                .collect();

            if component_edges.is_empty() {
                // A lone page never reaches the library.
                placed.push(
                    members
                        .into_iter()
                        .map(|index| (index, Slot::new(0, 0.0)))
                        .collect(),
                );
                continue;
            }

            placed.push(self.place_component(&members, &component_edges)?);
        }

        pack_components(graph.node_count(), placed)
    }
}
