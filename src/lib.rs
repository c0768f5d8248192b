//! # rectpack
//! rectpack implements greedy two-dimensional rectangle packing, accelerated by a jump-matrix
//! occupancy grid. The primary interface with this crate is the [`pack`] function.
//!
//! Rectangles are packed tallest-first into a shrinking bounding box; [`pack_with_options`]
//! exposes the knobs ([`PackOptions`]) that control how aggressively the search shrinks that box
//! before settling.

mod error;
mod grid;
mod options;
mod rectangle;
mod search;

pub use error::{PackError, MAX_DIMENSION};
pub use options::PackOptions;
pub use rectangle::{Enclosing, PackResult};

use rectangle::{BBoxRestrictions, Rectangle};

/// Packs `rectangles` (each a `(width, height)` pair, in the caller's order) using
/// [`PackOptions::default`].
///
/// See [`pack_with_options`] for the full contract.
pub fn pack(rectangles: &[(i64, i64)]) -> Result<PackResult, PackError> {
    pack_with_options(rectangles, PackOptions::default())
}

/// Packs `rectangles` into the smallest-area axis-aligned bounding box the search can find,
/// returning one position per input rectangle in the caller's original order.
///
/// # Sort order
/// Internally, rectangles are placed tallest-first (ties broken by original input index, via
/// [`Rectangle::id`](rectangle::Rectangle)) before being handed to the grid search; the returned
/// [`PackResult::positions`] are reassembled back into the caller's original order.
///
/// # Errors
/// Returns [`PackError::InvalidDimension`] if any width or height is non-positive or exceeds
/// [`MAX_DIMENSION`], and [`PackError::Overflow`] if the sum of dimensions would overflow the
/// engine's internal arithmetic. An empty `rectangles` slice packs trivially to a `0x0` box.
pub fn pack_with_options(
    rectangles: &[(i64, i64)],
    options: PackOptions,
) -> Result<PackResult, PackError> {
    if rectangles.is_empty() {
        return Ok(PackResult {
            positions: Vec::new(),
            enclosing: Enclosing::default(),
        });
    }

    let mut rects = validate(rectangles)?;
    let restrictions = compute_restrictions(&rects)?;

    // Tallest first, ties broken by original input order, mirroring a greedy shelf-packing
    // heuristic: taller rectangles are harder to place later and should claim space first.
    rects.sort_by(|a, b| b.height.cmp(&a.height).then(a.id.cmp(&b.id)));

    let enclosing = search::grid_search_bbox(&mut rects, &restrictions, &options)?;

    debug_assert!(
        rects.iter().all(|r| r.is_placed()),
        "grid_search_bbox reported success but left a rectangle unplaced"
    );

    let mut positions = vec![(0i64, 0i64); rects.len()];
    for rect in &rects {
        positions[rect.id - 1] = (rect.x, rect.y);
    }

    Ok(PackResult {
        positions,
        enclosing,
    })
}

fn validate(rectangles: &[(i64, i64)]) -> Result<Vec<Rectangle>, PackError> {
    rectangles
        .iter()
        .enumerate()
        .map(|(index, &(width, height))| {
            if width <= 0 || height <= 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
                return Err(PackError::InvalidDimension {
                    index,
                    width,
                    height,
                });
            }
            Ok(Rectangle::new(width, height, index + 1))
        })
        .collect()
}

/// Derives the bounding-box limits the search is allowed to try: `max_width`/`max_height` are
/// "every rectangle in a single row" / "every rectangle in a single column" respectively — each
/// configuration is always feasible, which matters because the search grows height upward from
/// `min_height` and must never be forced past a box it could otherwise still fit in.
/// `min_width`/`min_height` are the widest/tallest single rectangle, below which no valid packing
/// can exist. `max_area` is the product of the two sums rather than the sum of individual areas,
/// so that the degenerate single-row layout always fits the budget.
fn compute_restrictions(rects: &[Rectangle]) -> Result<BBoxRestrictions, PackError> {
    let mut sum_width: i64 = 0;
    let mut sum_height: i64 = 0;
    let mut max_width: i64 = 0;
    let mut max_height: i64 = 0;

    for rect in rects {
        sum_width = sum_width
            .checked_add(rect.width)
            .ok_or(PackError::Overflow)?;
        sum_height = sum_height
            .checked_add(rect.height)
            .ok_or(PackError::Overflow)?;
        max_width = max_width.max(rect.width);
        max_height = max_height.max(rect.height);
    }

    let max_area = sum_width.checked_mul(sum_height).ok_or(PackError::Overflow)?;

    Ok(BBoxRestrictions {
        min_width: max_width,
        max_width: sum_width,
        min_height: max_height,
        max_height: sum_height,
        max_area,
    })
}
