//! Single-element list moves.
//!
//! Every drag-to-reorder gesture in the editor ends up here: the home-section
//! list and the page list both delegate to [`reorder_by`]. The functions are
//! pure; they return a new list and never touch their input.
//!
//! A drag names the dragged element (`source`) and the element it was
//! dropped on (`dest`). The dragged element is removed from its index and
//! reinserted at the destination's index, shifting everything in between by
//! one. When the drop target could not be resolved, or names nothing in the
//! list, the result equals the input.

use log::debug;

/// Moves the element at `from` so that it ends up at index `to`.
///
/// Out-of-range indices leave the list unchanged.
///
/// # Examples
///
/// ```
/// use pagetree_core::reorder::move_item;
///
/// let moved = move_item(&["a", "b", "c", "d"], 3, 1);
/// assert_eq!(moved, ["a", "d", "b", "c"]);
/// ```
pub fn move_item<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut items = list.to_vec();
    if from >= items.len() || to >= items.len() || from == to {
        return items;
    }

    let item = items.remove(from);
    items.insert(to, item);
    items
}

/// Moves `source` to the position currently held by `dest`.
///
/// # Examples
///
/// ```
/// use pagetree_core::reorder::reorder;
///
/// let sections = ["Hero", "Features", "Testimonials", "CTA", "Footer"];
/// let reordered = reorder(&sections, &"CTA", Some(&"Features"));
/// assert_eq!(reordered, ["Hero", "CTA", "Features", "Testimonials", "Footer"]);
///
/// // An unresolved drop target is a no-op.
/// assert_eq!(reorder(&sections, &"CTA", None), sections);
/// ```
pub fn reorder<T: Clone + PartialEq>(list: &[T], source: &T, dest: Option<&T>) -> Vec<T> {
    reorder_by(list, |item| item, source, dest)
}

/// Like [`reorder`], but elements are matched through a key projection.
///
/// Used for lists of records identified by a field, such as pages by id.
pub fn reorder_by<T, K, F>(list: &[T], key: F, source: &K, dest: Option<&K>) -> Vec<T>
where
    T: Clone,
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    let Some(dest) = dest else {
        debug!("Drop target unresolved, keeping order");
        return list.to_vec();
    };
    if source == dest {
        return list.to_vec();
    }

    let position = |wanted: &K| list.iter().position(|item| key(item) == wanted);
    match (position(source), position(dest)) {
        (Some(from), Some(to)) => move_item(list, from, to),
        _ => {
            debug!("Reorder references an unknown element, keeping order");
            list.to_vec()
        }
    }
}
