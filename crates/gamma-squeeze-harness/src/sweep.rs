//! Convergence sweeps: the squeeze tabulated over a pivot range.

use serde::{Deserialize, Serialize};

use gamma_squeeze_core::{MAX_POSITIONS, NumericInstability, SliderPolicy, compute_squeeze};

use crate::error::HarnessError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRow {
    pub pivot: f64,
    pub lower_slope: f64,
    pub upper_slope: f64,
    pub gap: f64,
    pub relative_gap: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<NumericInstability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub offset: f64,
    pub rows: Vec<SweepRow>,
    /// True when no row's gap exceeds the previous row's.
    pub non_increasing: bool,
    /// Pivots where the gap grew relative to the previous row.
    pub regressions: Vec<f64>,
}

/// Evaluate the squeeze at `from, from + step, ..., to` (inclusive).
pub fn convergence_sweep(
    from: f64,
    to: f64,
    step: f64,
    offset: f64,
) -> Result<SweepReport, HarnessError> {
    let grid = SliderPolicy {
        min: from,
        max: to,
        step,
    };
    if !grid.is_valid() {
        return Err(HarnessError::InvalidSweep(format!(
            "need finite from <= to, step > 0 and at most {MAX_POSITIONS} rows, \
             got from={from} to={to} step={step}"
        )));
    }

    let mut rows = Vec::new();
    for pivot in grid.positions() {
        let r = compute_squeeze(pivot, offset)?;
        rows.push(SweepRow {
            pivot,
            lower_slope: r.lower_slope,
            upper_slope: r.upper_slope,
            gap: r.gap,
            relative_gap: r.relative_gap(),
            warnings: r.stability(),
        });
    }

    let regressions: Vec<f64> = rows
        .windows(2)
        .filter(|w| w[1].gap > w[0].gap)
        .map(|w| w[1].pivot)
        .collect();

    Ok(SweepReport {
        offset,
        non_increasing: regressions.is_empty(),
        regressions,
        rows,
    })
}

impl SweepReport {
    /// Rows that carry at least one precision warning.
    #[must_use]
    pub fn unstable_rows(&self) -> usize {
        self.rows.iter().filter(|r| !r.warnings.is_empty()).count()
    }

    /// Render as a markdown table.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Convergence sweep (offset = {})\n\n", self.offset));
        out.push_str(&format!("- Rows: {}\n", self.rows.len()));
        out.push_str(&format!("- Non-increasing: {}\n", self.non_increasing));
        out.push_str(&format!("- Unstable rows: {}\n\n", self.unstable_rows()));
        out.push_str("| Pivot | Lower slope | Upper slope | Gap | Relative gap |\n");
        out.push_str("|-------|-------------|-------------|-----|--------------|\n");
        for r in &self.rows {
            out.push_str(&format!(
                "| {:.2} | {:.6} | {:.6} | {:.6} | {:.3e} |\n",
                r.pivot, r.lower_slope, r.upper_slope, r.gap, r.relative_gap
            ));
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamma_squeeze_core::SqueezeError;

    #[test]
    fn slider_range_sweep_is_non_increasing() {
        let report = convergence_sweep(2.0, 15.0, 0.1, 0.5).unwrap();
        assert_eq!(report.rows.len(), 131);
        assert!(report.non_increasing, "{:?}", report.regressions);
        assert_eq!(report.unstable_rows(), 0);
        assert!(report.rows[0].gap > report.rows[130].gap);
    }

    #[test]
    fn invalid_ranges_rejected() {
        assert!(matches!(
            convergence_sweep(5.0, 2.0, 0.1, 0.5),
            Err(HarnessError::InvalidSweep(_))
        ));
        assert!(matches!(
            convergence_sweep(2.0, 5.0, 0.0, 0.5),
            Err(HarnessError::InvalidSweep(_))
        ));
        assert!(matches!(
            convergence_sweep(2.0, 15.0, 1e-300, 0.5),
            Err(HarnessError::InvalidSweep(_))
        ));
    }

    #[test]
    fn bad_offset_surfaces_core_error() {
        assert!(matches!(
            convergence_sweep(2.0, 3.0, 0.5, 1.0),
            Err(HarnessError::Squeeze(SqueezeError::Range { .. }))
        ));
    }

    #[test]
    fn markdown_has_one_line_per_row() {
        let report = convergence_sweep(2.0, 4.0, 1.0, 0.5).unwrap();
        let md = report.to_markdown();
        assert_eq!(md.lines().filter(|l| l.starts_with("| 2.00")).count(), 1);
        assert_eq!(report.rows.len(), 3);
    }
}
