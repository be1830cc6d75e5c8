//! Automatic layout for page hierarchies.
//!
//! Layout runs in two steps. An engine ([`engines`]) places every page on an
//! abstract grid: a rank (distance from the roots) and a cross-axis offset
//! measured in node slots. [`EngineBuilder::build`] then turns that
//! placement into pixel positions for the configured node size, spacing,
//! padding and direction.
//!
//! Positions are node top-left corners, computed as the slot center minus
//! half the node size.

mod engines;

pub use engines::{Placement, Slot};

use std::collections::HashMap;

use log::{debug, info, warn};

use pagetree_core::{
    document::Document,
    geometry::{Point, Size},
    identifier::PageId,
    options::{LayoutDirection, LayoutEngine},
};

use crate::{config::LayoutConfig, error::PagetreeError, structure::HierarchyGraph};

use engines::HierarchyEngine;

/// Final position for every page, keyed by id.
pub type Positions = HashMap<PageId, Point>;

/// Builder that runs a layout engine and converts its placement to pixels.
///
/// # Examples
///
/// ```
/// use pagetree::{config::LayoutConfig, layout::EngineBuilder};
/// use pagetree_core::{document::Document, options::LayoutDirection};
///
/// let document = Document::default();
/// let positions = EngineBuilder::new(&LayoutConfig::default())
///     .with_direction(LayoutDirection::TopToBottom)
///     .build(&document)
///     .expect("layout");
///
/// assert_eq!(positions.len(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    engine: LayoutEngine,
    direction: LayoutDirection,
    node_size: Size,
    node_spacing: f64,
    rank_spacing: f64,
    padding: f64,
}

impl EngineBuilder {
    /// Creates a builder from layout configuration.
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            engine: config.engine(),
            direction: config.direction(),
            node_size: config.node_size(),
            node_spacing: config.node_spacing(),
            rank_spacing: config.rank_spacing(),
            padding: config.padding(),
        }
    }

    /// Overrides the layout direction.
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Overrides the layout engine.
    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Computes positions for every page of `document`.
    ///
    /// The configured engine runs first. If the layered engine fails, the
    /// basic engine is used instead and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError::Layout`] if no engine could place the pages.
    pub fn build(&self, document: &Document) -> Result<Positions, PagetreeError> {
        let graph = HierarchyGraph::from_document(document);
        info!(
            nodes_count = graph.node_count(),
            edges_count = graph.edge_count(),
            engine = self.engine.to_string(),
            direction = self.direction.to_string();
            "Computing layout"
        );

        let placement = match self.engine {
            LayoutEngine::Sugiyama => {
                engines::sugiyama::Engine::new()
                    .place(&graph)
                    .or_else(|err| {
                        warn!(err:% = err; "Layered layout failed, falling back to basic layout");
                        engines::basic::Engine::new().place(&graph)
                    })?
            }
            LayoutEngine::Basic => engines::basic::Engine::new().place(&graph)?,
        };

        let positions = self.positions(&graph, &placement)?;
        debug!(positions_count = positions.len(); "Layout calculated");
        Ok(positions)
    }

    /// Computes positions and writes them into `document`.
    ///
    /// The document is only touched once every position is known.
    ///
    /// # Errors
    ///
    /// Same as [`EngineBuilder::build`]; the document is unchanged on error.
    pub fn apply(&self, document: &mut Document) -> Result<(), PagetreeError> {
        let positions = self.build(document)?;
        document.apply_positions(&positions);
        Ok(())
    }

    fn positions(
        &self,
        graph: &HierarchyGraph,
        placement: &Placement,
    ) -> Result<Positions, PagetreeError> {
        // Work in top-to-bottom terms and transpose at the end.
        let box_size = if self.direction.is_horizontal() {
            self.node_size.transpose()
        } else {
            self.node_size
        };
        let cross_pitch = box_size.width() + self.node_spacing;
        let rank_pitch = box_size.height() + self.rank_spacing;
        let origin = Point::new(self.padding, self.padding);

        let mut positions = Positions::with_capacity(graph.node_count());
        for (index, id) in graph.ids().enumerate() {
            let slot = placement.slot(index).ok_or_else(|| {
                PagetreeError::Layout(format!("Position not found for page {id}"))
            })?;

            let center = Point::new(
                slot.offset() * cross_pitch + box_size.width() / 2.0,
                slot.rank() as f64 * rank_pitch + box_size.height() / 2.0,
            );
            let top_left = center.sub_point(box_size.half());
            let top_left = if self.direction.is_horizontal() {
                top_left.transpose()
            } else {
                top_left
            };
            let position = top_left.add_point(origin);
            if !position.is_finite() {
                return Err(PagetreeError::Layout(format!(
                    "Position for page {id} is out of range"
                )));
            }
            positions.insert(id.clone(), position);
        }
        Ok(positions)
    }
}
