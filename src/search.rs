//! The delta-driven bounding-box search loop.

use log::{debug, trace};

use crate::error::PackError;
use crate::grid::Grid;
use crate::options::PackOptions;
use crate::rectangle::{BBoxRestrictions, Enclosing, Rectangle};

/// Repeatedly attempts to fit every rectangle in `rects` (already sorted, tallest first) into
/// candidate bounding boxes, starting from the tightest height the tallest rectangle allows and
/// growing by the reported `delta` on every attempt (successful or not), recomputing width from
/// the best area seen so far. Returns the smallest-area box found to admit a full placement, with
/// `rects` mutated in place to record final `(x, y)` positions for that box.
///
/// Returns [`PackError::AlgorithmFailure`] if not even a single attempt admits a placement, which
/// should never happen for validated input (the first attempt is always feasible: `min_height`
/// paired with a width derived from `max_area` admits at least the single-row layout).
pub(crate) fn grid_search_bbox(
    rects: &mut [Rectangle],
    restrictions: &BBoxRestrictions,
    options: &PackOptions,
) -> Result<Enclosing, PackError> {
    let capacity = rects.len() + 1;
    let mut height = restrictions.min_height;
    let mut width = restrictions.max_width.min(restrictions.max_area / height.max(1));
    let mut grid = Grid::new(capacity, width.max(1), height.max(1));

    let start_area = restrictions.max_area - 1;
    let mut best_area = start_area;
    let mut best_width = width;
    let mut best_height = height;
    let mut iterations: usize = 0;

    while height <= restrictions.max_height && width >= restrictions.min_width {
        if let Some(max_iter) = options.max_iterations {
            if iterations >= max_iter {
                break;
            }
        }
        iterations += 1;

        debug!(
            "grid_search_bbox: attempt {} at {}x{}",
            iterations, width, height
        );

        grid.clear(width, height);
        let (fit, delta) = attempt(&mut grid, rects, restrictions.max_height);

        if let Some(achieved_width) = fit {
            // Unconditional, matching the search's own contract: a full placement always
            // replaces the previous best, trusting the width/height recomputation below to keep
            // driving subsequent attempts toward a smaller area rather than re-checking here.
            best_height = height;
            best_width = achieved_width;
            best_area = best_height * best_width;
            if best_area <= options.happy_area {
                break;
            }
        }

        // Unconditional: height strictly increases every iteration (success or failure),
        // guaranteeing termination within `max_height` outer iterations.
        height = match height.checked_add(delta.max(1)) {
            Some(h) => h,
            None => break,
        };
        if height > restrictions.max_height {
            break;
        }

        width = candidate_width(restrictions.max_width, best_area, height);
    }

    if best_area == start_area {
        return Err(PackError::AlgorithmFailure);
    }

    // Replay: the exploratory attempts above dirtied every rectangle's (x, y); only the final,
    // clean pass against the winning box is allowed to stick.
    grid.clear(best_width, best_height);
    let (replay_fit, _) = attempt(&mut grid, rects, restrictions.max_height);
    if replay_fit.is_none() {
        return Err(PackError::AlgorithmFailure);
    }

    Ok(Enclosing {
        width: best_width,
        height: best_height,
    })
}

/// `min(max_width, area / height)`, floored at 1 so a zero-height edge case never divides by
/// zero; decremented by one when the product exactly equals `area`, so the next attempt at this
/// height is strictly smaller in area than the box it was derived from.
fn candidate_width(max_width: i64, area: i64, height: i64) -> i64 {
    let mut width = max_width.min(area / height.max(1));
    if width * height == area {
        width -= 1;
    }
    width
}

/// Attempts to place every rectangle into `grid` in order. Returns `(Some(achieved_width), delta)`
/// on success, where `achieved_width` is the rightmost edge reached by any placed rectangle
/// (which may be less than `grid.width`); returns `(None, delta)` on the first failure, where
/// `delta` is the smallest height growth observed across every rectangle attempted so far
/// (including ones placed before the failure).
fn attempt(grid: &mut Grid, rects: &mut [Rectangle], max_height: i64) -> (Option<i64>, i64) {
    let mut delta = max_height;
    let mut achieved_width: i64 = 0;

    for rect in rects.iter_mut() {
        let (region, rect_delta) = grid.find_region(rect.width, rect.height);
        delta = delta.min(rect_delta);

        match region {
            Some(region) => {
                achieved_width = achieved_width.max(region.col_end_pos);
                let x = grid.col_start(region.col_cell_start);
                let y = grid.row_start(region.row_cell_start);
                if grid.split(&region).is_err() {
                    return (None, delta.max(1));
                }
                rect.x = x;
                rect.y = y;
                trace!("attempt: placed rect {} at ({}, {})", rect.id, x, y);
            }
            None => return (None, delta.max(1)),
        }
    }

    (Some(achieved_width), delta.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(width: i64, height: i64, id: usize) -> Rectangle {
        Rectangle::new(width, height, id)
    }

    #[test]
    fn packs_two_equal_rectangles_side_by_side() {
        let mut rects = vec![rect(10, 10, 1), rect(10, 10, 2)];
        let restrictions = BBoxRestrictions {
            min_width: 10,
            max_width: 20,
            min_height: 10,
            max_height: 20,
            max_area: 400,
        };
        let enclosing = grid_search_bbox(&mut rects, &restrictions, &PackOptions::default())
            .expect("two 10x10 rectangles should pack into a 20x10 (or smaller-area) box");
        assert!(rects.iter().all(|r| r.is_placed()));
        assert!(enclosing.area() <= 400);
    }

    #[test]
    fn single_rectangle_packs_to_its_own_size() {
        let mut rects = vec![rect(5, 7, 1)];
        let restrictions = BBoxRestrictions {
            min_width: 5,
            max_width: 5,
            min_height: 7,
            max_height: 7,
            max_area: 35,
        };
        let enclosing = grid_search_bbox(&mut rects, &restrictions, &PackOptions::default()).unwrap();
        assert_eq!(enclosing, Enclosing { width: 5, height: 7 });
        assert_eq!((rects[0].x, rects[0].y), (0, 0));
    }

    #[test]
    fn happy_area_stops_search_early() {
        let mut rects = vec![rect(10, 10, 1), rect(10, 10, 2)];
        let restrictions = BBoxRestrictions {
            min_width: 10,
            max_width: 20,
            min_height: 10,
            max_height: 20,
            max_area: 400,
        };
        let options = PackOptions {
            happy_area: 200,
            max_iterations: None,
        };
        let enclosing = grid_search_bbox(&mut rects, &restrictions, &options).unwrap();
        assert!(enclosing.area() >= 200);
    }

    #[test]
    fn four_equal_squares_pack_without_overlap_or_waste() {
        // Four 50x50 squares: the first attempt (grid.height == min_height, the shared square
        // height) always succeeds with zero contention, so no rectangle's find_region call ever
        // observes a near-miss to drive delta below the full attempt height. The search therefore
        // settles on the single-row 200x50 layout rather than a squarer 100x100 arrangement — a
        // consequence of the greedy, non-optimal search (see the Non-goals in the module spec),
        // not a defect. This test asserts the properties the search always guarantees instead of
        // one specific box.
        let mut rects = vec![
            rect(50, 50, 1),
            rect(50, 50, 2),
            rect(50, 50, 3),
            rect(50, 50, 4),
        ];
        let restrictions = BBoxRestrictions {
            min_width: 50,
            max_width: 200,
            min_height: 50,
            max_height: 200,
            max_area: 200 * 200,
        };
        let enclosing = grid_search_bbox(&mut rects, &restrictions, &PackOptions::default()).unwrap();
        assert_eq!(enclosing.width * enclosing.height, 4 * 50 * 50, "no wasted cells for equal-height rectangles");
        assert!(rects.iter().all(|r| r.is_placed()));
    }
}
