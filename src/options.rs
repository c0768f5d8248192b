#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A simple struct for specifying options for a pack call.
///
/// * `happy_area` - once a successful placement's area drops to this value or below, the
///   bounding-box search terminates early instead of continuing to shrink the box. `0` (the
///   default) means "only stop early on a perfect, zero-waste packing"; raising it trades packing
///   tightness for fewer search iterations.
/// * `max_iterations` - an optional cap on the number of outer bbox-search iterations, on top of
///   the search's own height-bounded termination. `None` (the default) imposes no extra cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackOptions {
    pub happy_area: i64,
    pub max_iterations: Option<usize>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            happy_area: 0,
            max_iterations: None,
        }
    }
}
