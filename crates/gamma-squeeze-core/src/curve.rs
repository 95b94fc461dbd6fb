//! Context curve around a pivot.

use crate::error::SqueezeError;
use crate::squeeze::Point;

/// Default number of segments in a sampled window.
pub const CURVE_SEGMENTS: usize = 100;

/// Distance the window reaches left of the pivot.
const WINDOW_BEFORE: f64 = 1.5;
/// Distance the window reaches right of the pivot.
const WINDOW_AFTER: f64 = 2.5;

/// Sample the curve on `[pivot - 1.5, pivot + 2.5]` at `segments + 1`
/// evenly spaced abscissas, endpoints included.
pub fn sample_window(pivot: f64, segments: usize) -> Result<Vec<Point>, SqueezeError> {
    if !pivot.is_finite() {
        return Err(SqueezeError::NonFiniteInput {
            name: "pivot",
            value: pivot,
        });
    }
    if segments == 0 {
        return Err(SqueezeError::EmptyWindow);
    }

    let start = pivot - WINDOW_BEFORE;
    let end = pivot + WINDOW_AFTER;
    let width = end - start;

    (0..=segments)
        .map(|i| {
            let x = start + (i as f64 / segments as f64) * width;
            Point::at(x).map_err(SqueezeError::from)
        })
        .collect()
}
