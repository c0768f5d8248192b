//! Structured errors returned by [`crate::pack`].
//!
//! The core never writes to stderr; every failure, from a bad input dimension to an internal
//! invariant violation, is surfaced through [`PackError`].

use thiserror::Error;

/// Largest dimension accepted for a single rectangle side.
///
/// Chosen so that the sum of up to `isize::MAX` rectangles' widths (or heights) cannot overflow
/// `i64`.
pub const MAX_DIMENSION: i64 = i64::MAX / 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackError {
    /// A width or height was non-positive or exceeded [`MAX_DIMENSION`].
    #[error("rectangle {index} has invalid dimension ({width}, {height}): must be within 1..={MAX_DIMENSION}")]
    InvalidDimension {
        index: usize,
        width: i64,
        height: i64,
    },

    /// An input item could not be interpreted as a `(width, height)` pair of integers.
    #[error("input item {index} is not a valid (width, height) pair")]
    InvalidInput { index: usize },

    /// The sum of areas or dimensions exceeds what fits in the engine's integer range.
    #[error("computing bounding-box restrictions overflowed the supported integer range")]
    Overflow,

    /// The preallocated grid or one of its cell pools could not be obtained.
    #[error("failed to allocate a grid of capacity {capacity}")]
    AllocationFailure { capacity: usize },

    /// `grid_search_bbox` returned failure on input that passed validation; this indicates a bug
    /// in the engine rather than a problem with the caller's input.
    #[error("packing search failed to converge on valid input (this is an internal bug)")]
    AlgorithmFailure,
}
