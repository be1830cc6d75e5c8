//! Layout engines.
//!
//! Each engine implements [`HierarchyEngine`] and returns a [`Placement`]:
//! one [`Slot`] per page, indexed by the page's dense index in
//! [`HierarchyGraph`] (sorted id order). Slots are direction and size
//! agnostic; the caller maps them to pixels.
//!
//! - [`sugiyama::Engine`] - layered drawing through `rust-sugiyama`
//! - [`basic::Engine`] - tidy tree, also used as the fallback

pub(super) mod basic;
pub(super) mod sugiyama;

use crate::{error::PagetreeError, structure::HierarchyGraph};

/// Grid cell assigned to a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    rank: usize,
    offset: f64,
}

impl Slot {
    /// Creates a slot at `offset` along rank `rank`.
    pub fn new(rank: usize, offset: f64) -> Self {
        Self { rank, offset }
    }

    /// Distance from the roots; roots are rank 0.
    pub fn rank(self) -> usize {
        self.rank
    }

    /// Cross-axis offset in node slots; neighbours in a rank are at least 1.0
    /// apart.
    pub fn offset(self) -> f64 {
        self.offset
    }

    fn shifted(self, by: f64) -> Self {
        Self {
            rank: self.rank,
            offset: self.offset + by,
        }
    }
}

/// Slots for every page of a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    slots: Vec<Option<Slot>>,
}

impl Placement {
    fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Slot of the page at dense `index`.
    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied().flatten()
    }

    fn set(&mut self, index: usize, slot: Slot) {
        if let Some(entry) = self.slots.get_mut(index) {
            *entry = Some(slot);
        }
    }

    fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

/// Interface shared by the layout engines.
pub(super) trait HierarchyEngine {
    /// Places every page of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError::Layout`] if a page could not be placed.
    fn place(&self, graph: &HierarchyGraph) -> Result<Placement, PagetreeError>;
}

/// Lays out independently placed components side by side.
///
/// `components` holds, per component, the slots of its members with offsets
/// starting anywhere; each component is shifted so it starts right after the
/// previous one.
fn pack_components(
    len: usize,
    components: Vec<Vec<(usize, Slot)>>,
) -> Result<Placement, PagetreeError> {
    let mut placement = Placement::with_len(len);
    let mut cursor = 0.0;

    for component in components {
        let min = component
            .iter()
            .map(|(_, slot)| slot.offset())
            .fold(f64::INFINITY, f64::min);
        let max = component
            .iter()
            .map(|(_, slot)| slot.offset())
            .fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            continue;
        }

        for (index, slot) in component {
            placement.set(index, slot.shifted(cursor - min));
        }
        cursor += max - min + 1.0;
    }

    if !placement.is_complete() {
        return Err(PagetreeError::Layout(
            "Layout left some pages without a position".to_string(),
        ));
    }
    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_components_side_by_side() {
        let placement = pack_components(
            3,
            vec![
                vec![(0, Slot::new(0, -2.0)), (1, Slot::new(1, -1.0))],
                vec![(2, Slot::new(0, 7.0))],
            ],
        )
        .unwrap();

        assert_eq!(placement.slot(0), Some(Slot::new(0, 0.0)));
        assert_eq!(placement.slot(1), Some(Slot::new(1, 1.0)));
        assert_eq!(placement.slot(2), Some(Slot::new(0, 2.0)));
    }

    #[test]
    fn test_pack_components_reports_missing_pages() {
        let result = pack_components(2, vec![vec![(0, Slot::new(0, 0.0))]]);
        assert!(matches!(result, Err(PagetreeError::Layout(_))));
    }
}
