//! The convexity squeeze around a pivot.
//!
//! Two unit chords meet at `pivot`: one from `pivot - 1`, one to `pivot + 1`.
//! Because ln Γ is convex, extending each chord to `pivot + offset` gives a
//! lower and an upper bound for the curve there. The distance between the
//! two bounds is the gap, and it shrinks as the pivot moves right.

use serde::{Deserialize, Serialize};

use crate::error::{GammaError, SqueezeError};
use crate::math::log_gamma;

/// Relative error in `gap` above which a result is flagged as unreliable.
pub const CANCELLATION_TOLERANCE: f64 = 1e-6;

/// A point on the log-gamma curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Evaluate the curve at `x`.
    pub fn at(x: f64) -> Result<Self, GammaError> {
        Ok(Self { x, y: log_gamma(x)? })
    }
}

/// Everything a renderer needs to draw one frame of the squeeze.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqueezeResult {
    pub pivot: f64,
    pub offset: f64,
    pub prev: Point,
    pub curr: Point,
    pub next: Point,
    /// The curve itself at `pivot + offset`.
    pub target: Point,
    pub lower_slope: f64,
    pub upper_slope: f64,
    pub lower_bound_y: f64,
    pub upper_bound_y: f64,
    /// `upper_bound_y - lower_bound_y`.
    pub gap: f64,
}

/// Non-fatal precision warnings for extreme pivots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericInstability {
    /// The bounds are large next to their difference, so the gap carries
    /// few significant digits.
    CancellationRisk {
        gap: f64,
        magnitude: f64,
        relative_error: f64,
    },
    /// Both chords have the same floating-point slope; the gap has
    /// collapsed to zero below the resolution of f64.
    CollapsedGap { pivot: f64 },
}

/// Compute the squeeze at `pivot + offset`.
///
/// `pivot` may be fractional (a host slider moves continuously); the chords
/// are always taken over `pivot - 1`, `pivot`, `pivot + 1`. `offset` must lie
/// strictly inside `(0, 1)`.
///
/// ```
/// use gamma_squeeze_core::compute_squeeze;
///
/// let r = compute_squeeze(2.0, 0.5).unwrap();
/// assert!((r.upper_slope - 2.0_f64.ln()).abs() < 1e-12);
/// assert!((r.gap - 0.5 * 2.0_f64.ln()).abs() < 1e-12);
/// ```
pub fn compute_squeeze(pivot: f64, offset: f64) -> Result<SqueezeResult, SqueezeError> {
    if !pivot.is_finite() {
        return Err(SqueezeError::NonFiniteInput {
            name: "pivot",
            value: pivot,
        });
    }
    if !offset.is_finite() {
        return Err(SqueezeError::NonFiniteInput {
            name: "offset",
            value: offset,
        });
    }
    if offset <= 0.0 || offset >= 1.0 {
        return Err(SqueezeError::Range { offset });
    }

    let prev = Point::at(pivot - 1.0)?;
    let curr = Point::at(pivot)?;
    let next = Point::at(pivot + 1.0)?;
    let target = Point::at(pivot + offset)?;

    // Unit-width chords, so the slopes are plain differences.
    let lower_slope = curr.y - prev.y;
    let upper_slope = next.y - curr.y;

    let lower_bound_y = curr.y + lower_slope * offset;
    let upper_bound_y = curr.y + upper_slope * offset;

    Ok(SqueezeResult {
        pivot,
        offset,
        prev,
        curr,
        next,
        target,
        lower_slope,
        upper_slope,
        lower_bound_y,
        upper_bound_y,
        gap: upper_bound_y - lower_bound_y,
    })
}

impl SqueezeResult {
    /// `[lower_bound_y, upper_bound_y]`.
    #[must_use]
    pub const fn bounds(&self) -> (f64, f64) {
        (self.lower_bound_y, self.upper_bound_y)
    }

    /// Whether the curve value at the target lies inside the bounds.
    ///
    /// Expected for convex input but not guaranteed once rounding enters.
    #[must_use]
    pub fn target_trapped(&self) -> bool {
        self.lower_bound_y <= self.target.y && self.target.y <= self.upper_bound_y
    }

    /// Gap relative to the height of the curve at the pivot.
    #[must_use]
    pub fn relative_gap(&self) -> f64 {
        self.gap / self.curr.y.abs().max(1.0)
    }

    /// Precision warnings for this result. Empty for ordinary pivots.
    #[must_use]
    pub fn stability(&self) -> Vec<NumericInstability> {
        let mut warnings = Vec::new();
        let magnitude = self
            .lower_bound_y
            .abs()
            .max(self.upper_bound_y.abs())
            .max(1.0);

        if self.gap == 0.0 {
            warnings.push(NumericInstability::CollapsedGap { pivot: self.pivot });
        } else {
            let relative_error = magnitude * f64::EPSILON / self.gap.abs();
            if relative_error > CANCELLATION_TOLERANCE {
                warnings.push(NumericInstability::CancellationRisk {
                    gap: self.gap,
                    magnitude,
                    relative_error,
                });
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_at_pivot_two() {
        let r = compute_squeeze(2.0, 0.5).unwrap();
        let ln2 = 2.0_f64.ln();
        assert!(r.lower_slope.abs() < 1e-12);
        assert!((r.upper_slope - ln2).abs() < 1e-12);
        assert!(r.lower_bound_y.abs() < 1e-12);
        assert!((r.upper_bound_y - 0.346_573_590_279_972_5).abs() < 1e-12);
        assert!((r.gap - 0.346_573_590_279_972_5).abs() < 1e-12);
        assert_eq!(r.prev.x, 1.0);
        assert_eq!(r.next.x, 3.0);
        assert_eq!(r.target.x, 2.5);
        assert!(r.target_trapped());
        assert!(r.stability().is_empty());
    }

    #[test]
    fn offset_outside_open_unit_interval_is_range_error() {
        for offset in [0.0, 1.0, -0.25, 1.5] {
            assert_eq!(
                compute_squeeze(5.0, offset),
                Err(SqueezeError::Range { offset })
            );
        }
    }

    #[test]
    fn non_finite_inputs_rejected_before_evaluation() {
        assert!(matches!(
            compute_squeeze(f64::NAN, 0.5),
            Err(SqueezeError::NonFiniteInput { name: "pivot", .. })
        ));
        assert!(matches!(
            compute_squeeze(3.0, f64::INFINITY),
            Err(SqueezeError::NonFiniteInput { name: "offset", .. })
        ));
    }

    #[test]
    fn poles_propagate_as_domain_errors() {
        assert_eq!(
            compute_squeeze(1.0, 0.5),
            Err(SqueezeError::Gamma(GammaError::Domain { z: 0.0 }))
        );
        assert_eq!(
            compute_squeeze(-1.0, 0.5),
            Err(SqueezeError::Gamma(GammaError::Domain { z: -2.0 }))
        );
    }

    #[test]
    fn fractional_pivot_keeps_unit_chords() {
        let r = compute_squeeze(4.3, 0.25).unwrap();
        assert!((r.prev.x - 3.3).abs() < 1e-12);
        assert!((r.next.x - 5.3).abs() < 1e-12);
        assert!(r.lower_slope <= r.upper_slope);
        assert!(r.gap >= 0.0);
    }

    #[test]
    fn extreme_pivot_reports_cancellation_risk() {
        let r = compute_squeeze(1e5, 0.5).unwrap();
        assert!(
            r.stability()
                .iter()
                .any(|w| matches!(w, NumericInstability::CancellationRisk { .. }))
        );
        let modest = compute_squeeze(1e3, 0.5).unwrap();
        assert!(modest.stability().is_empty());
    }

    #[test]
    fn huge_pivot_collapses_gap() {
        let r = compute_squeeze(1e15, 0.5).unwrap();
        assert_eq!(r.gap, 0.0);
        let (lower, upper) = r.bounds();
        assert_eq!(lower, upper);
        assert_eq!(
            r.stability(),
            vec![NumericInstability::CollapsedGap { pivot: 1e15 }]
        );
    }

    #[test]
    fn result_serializes_with_snake_case_fields() {
        let r = compute_squeeze(3.0, 0.5).unwrap();
        let json = serde_json::to_value(r).unwrap();
        assert!(json["lower_bound_y"].is_number());
        assert_eq!(json["target"]["x"], 3.5);
    }
}
