//! Fixture loading and management.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Default tolerance: relative, floored at an absolute scale of one.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_mode() -> String {
    "both".to_string()
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// `log_gamma` or `compute_squeeze`.
    pub function: String,
    /// Property family the case belongs to (e.g. `known_values`).
    pub check: String,
    /// Named numeric inputs (`z`, or `pivot` and `offset`).
    pub inputs: BTreeMap<String, f64>,
    /// Expected output fields. Empty when an error is expected.
    #[serde(default)]
    pub expected: BTreeMap<String, f64>,
    /// Expected error kind (`domain`, `range`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_error: Option<String>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// `strict`, `hardened`, or `both`.
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl FixtureCase {
    /// Look up a numeric input by name.
    pub fn input(&self, field: &str) -> Result<f64, HarnessError> {
        self.inputs
            .get(field)
            .copied()
            .ok_or_else(|| HarnessError::MissingInput {
                case: self.name.clone(),
                field: field.to_string(),
            })
    }
}

/// A collection of fixture cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    pub family: String,
    /// Where the expected values came from.
    pub source: String,
    pub captured_at: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
