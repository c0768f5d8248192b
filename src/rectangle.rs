//! The rectangles the packer places, and the bounding boxes it places them in.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel used internally for the `x`/`y` fields of a [`Rectangle`] that has not yet been
/// placed by the grid search.
pub(crate) const UNPLACED: i64 = -1;

/// A rectangle to be packed.
///
/// Constructed from user input by [`crate::pack`] with [`Rectangle::x`]/[`Rectangle::y`] set to
/// the unplaced sentinel; mutated only once, to record the position chosen by the search.
///
/// * `id` is a 1-based index, unique within a single [`crate::pack`] call. It is never
///   interpreted by the engine beyond tie-breaking the initial sort (see
///   [`crate::pack`](crate::pack#sort-order)); it exists purely for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    pub width: i64,
    pub height: i64,
    pub x: i64,
    pub y: i64,
    pub id: usize,
    pub area: i64,
}

impl Rectangle {
    pub(crate) fn new(width: i64, height: i64, id: usize) -> Self {
        Self {
            width,
            height,
            x: UNPLACED,
            y: UNPLACED,
            id,
            area: width * height,
        }
    }

    pub(crate) fn is_placed(&self) -> bool {
        self.x != UNPLACED && self.y != UNPLACED
    }
}

/// The achieved bounding box of a successful pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enclosing {
    pub width: i64,
    pub height: i64,
}

impl Enclosing {
    pub fn area(&self) -> i64 {
        self.width * self.height
    }
}

/// Bounds within which [`crate::search::grid_search_bbox`] is allowed to try candidate bounding
/// boxes. Immutable over the course of a single pack call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BBoxRestrictions {
    pub min_width: i64,
    pub max_width: i64,
    pub min_height: i64,
    pub max_height: i64,
    pub max_area: i64,
}

/// The final result of a successful [`crate::pack`] call: one position per input rectangle, in
/// the caller's original order, plus the bounding box that contains them all.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackResult {
    /// `positions[i]` is the `(x, y)` of the top-left corner of the i-th input rectangle.
    pub positions: Vec<(i64, i64)>,
    pub enclosing: Enclosing,
}
