//! Test execution engine.

use std::collections::BTreeMap;

use gamma_squeeze_core::{
    HealingPolicy, InputMode, SqueezeError, SqueezeResult, guarded_squeeze, log_gamma,
};

use crate::error::HarnessError;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::{VerificationResult, compare_fields, render_fields};

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Input mode the squeeze cases run under.
    pub mode: InputMode,
    policy: HealingPolicy,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: InputMode) -> Self {
        Self {
            campaign: campaign.into(),
            mode,
            policy: HealingPolicy::new(),
        }
    }

    /// Heals applied so far (hardened runs only).
    #[must_use]
    pub fn heals_applied(&self) -> u64 {
        self.policy.total()
    }

    /// Run all fixtures in a set whose mode matches, and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .filter(|case| mode_matches(self.mode, &case.mode))
            .map(|case| self.verify_case(case))
            .collect()
    }

    fn verify_case(&self, case: &FixtureCase) -> VerificationResult {
        let case_name = if case.mode.eq_ignore_ascii_case("both") {
            format!("{} [{}]", case.name, self.mode.as_str())
        } else {
            case.name.clone()
        };
        let expected = match &case.expect_error {
            Some(kind) => format!("error:{kind}"),
            None => render_fields(&case.expected),
        };

        let (passed, actual, diff) = match self.execute_case(case) {
            Ok(Ok(fields)) => {
                let actual = render_fields(&fields);
                if let Some(kind) = &case.expect_error {
                    (false, actual, Some(format!("expected error:{kind}, got a value")))
                } else {
                    let mismatches = compare_fields(&case.expected, &fields, case.tolerance);
                    let diff = (!mismatches.is_empty()).then(|| mismatches.join("\n"));
                    (mismatches.is_empty(), actual, diff)
                }
            }
            Ok(Err(err)) => {
                let actual = format!("error:{}", err.kind());
                match &case.expect_error {
                    Some(kind) if kind == err.kind() => (true, actual, None),
                    _ => (false, actual, Some(err.to_string())),
                }
            }
            Err(err) => (false, format!("unsupported:{err}"), Some(err.to_string())),
        };

        VerificationResult {
            case_name,
            check: case.check.clone(),
            mode: self.mode.as_str().to_string(),
            passed,
            expected,
            actual,
            diff,
        }
    }

    fn execute_case(
        &self,
        case: &FixtureCase,
    ) -> Result<Result<BTreeMap<String, f64>, SqueezeError>, HarnessError> {
        match case.function.as_str() {
            "log_gamma" => {
                let z = case.input("z")?;
                Ok(log_gamma(z)
                    .map(|value| BTreeMap::from([("value".to_string(), value)]))
                    .map_err(SqueezeError::from))
            }
            "compute_squeeze" => {
                let pivot = case.input("pivot")?;
                let offset = case.input("offset")?;
                Ok(guarded_squeeze(pivot, offset, self.mode, &self.policy)
                    .map(|(result, _)| squeeze_fields(&result)))
            }
            other => Err(HarnessError::UnknownFunction {
                case: case.name.clone(),
                function: other.to_string(),
            }),
        }
    }
}

/// Flatten a squeeze result into the field names fixtures use.
#[must_use]
pub fn squeeze_fields(r: &SqueezeResult) -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("pivot".to_string(), r.pivot),
        ("offset".to_string(), r.offset),
        ("prev_y".to_string(), r.prev.y),
        ("curr_y".to_string(), r.curr.y),
        ("next_y".to_string(), r.next.y),
        ("target_y".to_string(), r.target.y),
        ("lower_slope".to_string(), r.lower_slope),
        ("upper_slope".to_string(), r.upper_slope),
        ("lower_bound_y".to_string(), r.lower_bound_y),
        ("upper_bound_y".to_string(), r.upper_bound_y),
        ("gap".to_string(), r.gap),
    ])
}

fn mode_matches(active: InputMode, case_mode: &str) -> bool {
    let case = case_mode.to_ascii_lowercase();
    case == "both" || case == active.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "version":"v1",
        "family":"squeeze",
        "source":"unit",
        "captured_at":"2026-01-01T00:00:00Z",
        "cases":[
            {"name":"pivot_two","function":"compute_squeeze","check":"end_to_end","inputs":{"pivot":2.0,"offset":0.5},"expected":{"gap":0.34657359027997264}},
            {"name":"offset_one","function":"compute_squeeze","check":"range","inputs":{"pivot":5.0,"offset":1.0},"expect_error":"range","mode":"strict"},
            {"name":"offset_one_clamped","function":"compute_squeeze","check":"range","inputs":{"pivot":5.0,"offset":1.0},"expected":{"offset":0.999999999},"mode":"hardened"},
            {"name":"pole","function":"log_gamma","check":"domain","inputs":{"z":-1.0},"expect_error":"domain"},
            {"name":"bogus","function":"erf","check":"unknown","inputs":{"z":1.0},"expected":{"value":0.0},"mode":"strict"}
        ]
    }"#;

    #[test]
    fn strict_runner_executes_matching_cases() {
        let fixture = FixtureSet::from_json(FIXTURE).unwrap();
        let results = TestRunner::new("smoke", InputMode::Strict).run(&fixture);
        assert_eq!(results.len(), 4);
        assert!(results[0].passed, "{:?}", results[0]);
        assert_eq!(results[0].case_name, "pivot_two [strict]");
        assert!(results[1].passed, "{:?}", results[1]);
        assert!(results[2].passed, "{:?}", results[2]);
        assert!(!results[3].passed);
        assert!(results[3].actual.starts_with("unsupported:"));
    }

    #[test]
    fn hardened_runner_heals_out_of_range_offsets() {
        let fixture = FixtureSet::from_json(FIXTURE).unwrap();
        let runner = TestRunner::new("smoke", InputMode::Hardened);
        let results = runner.run(&fixture);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert_eq!(runner.heals_applied(), 1);
    }
}
