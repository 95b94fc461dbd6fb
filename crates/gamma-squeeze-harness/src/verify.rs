//! Output comparison and verification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of verifying a single case or property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub case_name: String,
    /// Property family (e.g. `discrete_convexity`).
    pub check: String,
    /// Mode the case ran under.
    pub mode: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    /// Mismatch description, or an informational note on a pass.
    pub diff: Option<String>,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    /// Build a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            total,
            passed,
            failed,
            results,
        }
    }

    /// Returns true if all cases passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// `|actual - expected| <= tolerance * max(|expected|, 1)`.
#[must_use]
pub fn within_tolerance(actual: f64, expected: f64, tolerance: f64) -> bool {
    actual.is_finite() && (actual - expected).abs() <= tolerance * expected.abs().max(1.0)
}

/// Compare every expected field against `actual`. Returns one line per
/// mismatch; empty means all fields matched.
#[must_use]
pub fn compare_fields(
    expected: &BTreeMap<String, f64>,
    actual: &BTreeMap<String, f64>,
    tolerance: f64,
) -> Vec<String> {
    let mut mismatches = Vec::new();
    for (field, want) in expected {
        match actual.get(field) {
            Some(got) if within_tolerance(*got, *want, tolerance) => {}
            Some(got) => mismatches.push(format!(
                "{field}: expected {want:.12e}, got {got:.12e} (delta {:.3e})",
                (got - want).abs()
            )),
            None => mismatches.push(format!("{field}: missing from output")),
        }
    }
    mismatches
}

/// Render a field map as `key=value` pairs in key order.
#[must_use]
pub fn render_fields(fields: &BTreeMap<String, f64>) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}={v:.12}"))
        .collect::<Vec<_>>()
        .join(", ")
}
