//! Integration test: reference fixture conformance.
//!
//! Loads `tests/conformance/log_gamma_reference.v1.json` from the workspace
//! root and runs it under both input modes.
//!
//! Run: cargo test -p gamma-squeeze-harness --test reference_fixture_test

use std::path::{Path, PathBuf};

use gamma_squeeze_core::InputMode;
use gamma_squeeze_harness::{ConformanceReport, FixtureSet, TestRunner, VerificationSummary};

fn workspace_root() -> PathBuf {
    let manifest = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn load_reference() -> FixtureSet {
    let path = workspace_root().join("tests/conformance/log_gamma_reference.v1.json");
    FixtureSet::from_file(&path).expect("reference fixture should load")
}

#[test]
fn reference_fixture_is_well_formed() {
    let set = load_reference();
    assert_eq!(set.version, "v1");
    assert!(!set.cases.is_empty());

    let mut names: Vec<&str> = set.cases.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), set.cases.len(), "case names must be unique");

    for case in &set.cases {
        assert!(
            case.expect_error.is_some() != !case.expected.is_empty(),
            "{}: exactly one of expected/expect_error",
            case.name
        );
        assert!(
            ["strict", "hardened", "both"].contains(&case.mode.as_str()),
            "{}: bad mode {}",
            case.name,
            case.mode
        );
    }
}

#[test]
fn strict_mode_passes_every_case() {
    let set = load_reference();
    let runner = TestRunner::new("reference", InputMode::Strict);
    let results = runner.run(&set);
    assert!(!results.is_empty());
    for r in &results {
        assert!(r.passed, "{} [{}]: {:?}", r.case_name, r.check, r.diff);
    }
    assert_eq!(runner.heals_applied(), 0);
}

#[test]
fn hardened_mode_passes_every_case_and_heals() {
    let set = load_reference();
    let runner = TestRunner::new("reference", InputMode::Hardened);
    let results = runner.run(&set);
    for r in &results {
        assert!(r.passed, "{} [{}]: {:?}", r.case_name, r.check, r.diff);
    }
    assert!(runner.heals_applied() >= 2);
}

#[test]
fn combined_report_is_clean() {
    let set = load_reference();
    let mut results = TestRunner::new("reference", InputMode::Strict).run(&set);
    results.extend(TestRunner::new("reference", InputMode::Hardened).run(&set));
    let summary = VerificationSummary::from_results(results);
    assert!(summary.all_passed());

    let report = ConformanceReport {
        title: "Reference".into(),
        mode: "strict+hardened".into(),
        timestamp: "2026-10-17T00:00:00.000Z".into(),
        summary,
    };
    let md = report.to_markdown();
    assert!(md.contains("| pole_zero [strict] | domain | strict | PASS |"));
    assert!(md.contains("| offset_one_clamped | range | hardened | PASS |"));
    assert!(!md.contains("FAIL"));
}
