//! Property checks for the log-gamma engine and the squeeze model.
//!
//! Each check evaluates the core over a fixed sample and reports one
//! [`VerificationResult`]. They run under strict input handling.

use std::f64::consts::PI;

use gamma_squeeze_core::{GammaError, SliderPolicy, SqueezeError, compute_squeeze, log_gamma};

use crate::verify::{VerificationResult, VerificationSummary, within_tolerance};

/// Offsets used by the bound-ordering sweep.
pub const ORDERING_OFFSETS: [f64; 3] = [0.1, 0.5, 0.9];
/// Pivots used by the convergence check.
pub const CONVERGENCE_PIVOTS: [f64; 4] = [2.0, 5.0, 10.0, 15.0];

fn result(
    name: &str,
    expected: impl Into<String>,
    failures: Vec<String>,
    note: Option<String>,
) -> VerificationResult {
    let passed = failures.is_empty();
    VerificationResult {
        case_name: name.to_string(),
        check: name.to_string(),
        mode: "strict".to_string(),
        passed,
        expected: expected.into(),
        actual: if passed {
            "ok".to_string()
        } else {
            format!("{} violation(s)", failures.len())
        },
        diff: if passed { note } else { Some(failures.join("\n")) },
    }
}

/// `ln Γ(z) + ln Γ(1 - z) = ln π - ln sin(πz)` on `(0, 0.5)`.
#[must_use]
pub fn reflection_consistency() -> VerificationResult {
    let mut failures = Vec::new();
    for i in 1..100 {
        let z = f64::from(i) * 0.005;
        let rhs = PI.ln() - (PI * z).sin().ln();
        match (log_gamma(z), log_gamma(1.0 - z)) {
            (Ok(a), Ok(b)) => {
                if (a + b - rhs).abs() > 1e-9 * rhs.abs() {
                    failures.push(format!("z={z}: {} vs {rhs}", a + b));
                }
            }
            (Err(e), _) | (_, Err(e)) => failures.push(format!("z={z}: {e}")),
        }
    }
    result(
        "reflection_consistency",
        "relative error <= 1e-9 on (0, 0.5)",
        failures,
        None,
    )
}

/// Closed-form values of Γ.
#[must_use]
pub fn known_values() -> VerificationResult {
    let cases = [
        (1.0, 0.0),
        (2.0, 0.0),
        (6.0, 120.0_f64.ln()),
        (0.5, PI.sqrt().ln()),
        (3.0, 2.0_f64.ln()),
    ];
    let failures = cases
        .iter()
        .filter_map(|&(z, want)| match log_gamma(z) {
            Ok(got) if within_tolerance(got, want, 1e-10) => None,
            Ok(got) => Some(format!("z={z}: expected {want}, got {got}")),
            Err(e) => Some(format!("z={z}: {e}")),
        })
        .collect();
    result(
        "known_values",
        "ln Γ(1)=ln Γ(2)=0, ln Γ(6)=ln 120, ln Γ(0.5)=ln √π",
        failures,
        None,
    )
}

/// Slopes of consecutive unit chords on integers `2..=50` are ordered.
#[must_use]
pub fn discrete_convexity() -> VerificationResult {
    let mut failures = Vec::new();
    for n in 2..=50 {
        let n = f64::from(n);
        match (log_gamma(n - 1.0), log_gamma(n), log_gamma(n + 1.0)) {
            (Ok(a), Ok(b), Ok(c)) => {
                if b - a > c - b {
                    failures.push(format!("n={n}: {} > {}", b - a, c - b));
                }
            }
            _ => failures.push(format!("n={n}: evaluation failed")),
        }
    }
    result(
        "discrete_convexity",
        "lower slope <= upper slope for n in [2, 50]",
        failures,
        None,
    )
}

/// `lower_bound_y <= upper_bound_y` over the slider range at half steps.
#[must_use]
pub fn bound_ordering() -> VerificationResult {
    let grid = SliderPolicy {
        step: 0.5,
        ..SliderPolicy::default()
    };
    let mut failures = Vec::new();
    for pivot in grid.positions() {
        for offset in ORDERING_OFFSETS {
            match compute_squeeze(pivot, offset) {
                Ok(r) if r.lower_bound_y <= r.upper_bound_y && r.gap >= 0.0 => {}
                Ok(r) => failures.push(format!(
                    "pivot={pivot} offset={offset}: [{}, {}]",
                    r.lower_bound_y, r.upper_bound_y
                )),
                Err(e) => failures.push(format!("pivot={pivot} offset={offset}: {e}")),
            }
        }
    }
    result(
        "bound_ordering",
        "lower bound <= upper bound for pivot in [2, 15], offset in {0.1, 0.5, 0.9}",
        failures,
        None,
    )
}

/// The gap at offset 0.5 does not grow along increasing pivots.
#[must_use]
pub fn convergence() -> VerificationResult {
    let mut failures = Vec::new();
    let mut gaps = Vec::new();
    for pivot in CONVERGENCE_PIVOTS {
        match compute_squeeze(pivot, 0.5) {
            Ok(r) => gaps.push((pivot, r.gap)),
            Err(e) => failures.push(format!("pivot={pivot}: {e}")),
        }
    }
    for w in gaps.windows(2) {
        if w[1].1 > w[0].1 {
            failures.push(format!(
                "gap grew from {} (pivot {}) to {} (pivot {})",
                w[0].1, w[0].0, w[1].1, w[1].0
            ));
        }
    }
    let note = gaps
        .iter()
        .map(|(p, g)| format!("gap({p})={g:.6}"))
        .collect::<Vec<_>>()
        .join(", ");
    result(
        "convergence",
        "gap non-increasing over pivots 2, 5, 10, 15",
        failures,
        Some(note),
    )
}

/// Poles and out-of-range offsets are rejected with the right error.
#[must_use]
pub fn domain_rejection() -> VerificationResult {
    let mut failures = Vec::new();
    for z in [0.0, -1.0, -2.0] {
        if log_gamma(z) != Err(GammaError::Domain { z }) {
            failures.push(format!("log_gamma({z}) did not fail with a domain error"));
        }
    }
    for offset in [0.0, 1.0] {
        if compute_squeeze(5.0, offset) != Err(SqueezeError::Range { offset }) {
            failures.push(format!(
                "compute_squeeze(5, {offset}) did not fail with a range error"
            ));
        }
    }
    result(
        "domain_rejection",
        "domain error at 0, -1, -2; range error at offsets 0 and 1",
        failures,
        None,
    )
}

/// The worked example at pivot 2, offset 0.5.
#[must_use]
pub fn end_to_end() -> VerificationResult {
    let ln2 = 2.0_f64.ln();
    let failures = match compute_squeeze(2.0, 0.5) {
        Ok(r) => [
            ("lower_slope", r.lower_slope, 0.0),
            ("upper_slope", r.upper_slope, ln2),
            ("lower_bound_y", r.lower_bound_y, 0.0),
            ("upper_bound_y", r.upper_bound_y, ln2 / 2.0),
            ("gap", r.gap, ln2 / 2.0),
        ]
        .iter()
        .filter(|(_, got, want)| !within_tolerance(*got, *want, 1e-10))
        .map(|(field, got, want)| format!("{field}: expected {want}, got {got}"))
        .collect(),
        Err(e) => vec![e.to_string()],
    };
    result(
        "end_to_end",
        "pivot 2, offset 0.5: slopes 0 and ln 2, gap ln 2 / 2",
        failures,
        None,
    )
}

/// Whether the curve value at the target sits inside the bounds.
///
/// Informational: convexity predicts it but rounding may not honour it, so
/// escapes are noted without failing.
#[must_use]
pub fn target_containment() -> VerificationResult {
    let grid = SliderPolicy {
        step: 0.5,
        ..SliderPolicy::default()
    };
    let mut escapes = Vec::new();
    let mut failures = Vec::new();
    for pivot in grid.positions() {
        for offset in ORDERING_OFFSETS {
            match compute_squeeze(pivot, offset) {
                Ok(r) if r.target_trapped() => {}
                Ok(_) => escapes.push(format!("pivot={pivot} offset={offset}")),
                Err(e) => failures.push(format!("pivot={pivot} offset={offset}: {e}")),
            }
        }
    }
    let note = (!escapes.is_empty()).then(|| format!("target escaped at: {}", escapes.join("; ")));
    result(
        "target_containment",
        "target value within bounds (informational)",
        failures,
        note,
    )
}

/// Run every property check.
#[must_use]
pub fn run_all() -> VerificationSummary {
    VerificationSummary::from_results(vec![
        reflection_consistency(),
        known_values(),
        discrete_convexity(),
        bound_ordering(),
        convergence(),
        domain_rejection(),
        end_to_end(),
        target_containment(),
    ])
}
