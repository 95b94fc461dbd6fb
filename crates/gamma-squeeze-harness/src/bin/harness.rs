//! CLI entrypoint for the gamma squeeze harness.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use gamma_squeeze_core::{
    CURVE_SEGMENTS, HealingPolicy, InputMode, SqueezeConfig, SqueezeError, Transition,
    Walkthrough, gamma, guarded_squeeze, log_gamma, sample_window,
};
use gamma_squeeze_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, StreamKind, now_utc,
    validate_log_file,
};
use gamma_squeeze_harness::{
    ConformanceReport, FixtureSet, TestRunner, VerificationResult, VerificationSummary,
    convergence_sweep, properties,
};

/// Numeric tooling for the log-gamma squeeze.
#[derive(Debug, Parser)]
#[command(name = "gamma-squeeze-harness")]
#[command(about = "Evaluate, sweep and verify the log-gamma convexity squeeze")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate ln|Γ(z)| (and Γ(z) when representable).
    Eval {
        #[arg(long, allow_negative_numbers = true)]
        z: f64,
        /// Structured JSONL log output path (`-` for stdout).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Compute the squeeze at `pivot + offset`.
    Squeeze {
        #[arg(long, allow_negative_numbers = true)]
        pivot: f64,
        /// Defaults to the narrative offset (0.5).
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<f64>,
        /// `strict` or `hardened`; defaults to GAMMA_SQUEEZE_MODE.
        #[arg(long)]
        mode: Option<String>,
        /// Structured JSONL log output path (`-` for stdout).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Tabulate the gap over a pivot range.
    Sweep {
        /// Defaults to the slider minimum.
        #[arg(long, allow_negative_numbers = true)]
        from: Option<f64>,
        /// Defaults to the slider maximum.
        #[arg(long, allow_negative_numbers = true)]
        to: Option<f64>,
        /// Defaults to the slider step.
        #[arg(long)]
        step: Option<f64>,
        #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
        offset: f64,
        /// Output format: `json` (default) or `markdown`.
        #[arg(long, default_value = "json")]
        format: String,
        /// Output file path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Structured JSONL log output path (`-` for stdout).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Sample the curve on `[pivot - 1.5, pivot + 2.5]`.
    Curve {
        #[arg(long, allow_negative_numbers = true)]
        pivot: f64,
        #[arg(long, default_value_t = CURVE_SEGMENTS)]
        segments: usize,
    },
    /// Replay walkthrough transitions and print each state.
    Walkthrough {
        /// Comma-separated `next`/`back` list.
        #[arg(long, value_delimiter = ',', default_value = "next,next,next")]
        transitions: Vec<String>,
        /// Slider value applied once the pivot becomes adjustable.
        #[arg(long, allow_negative_numbers = true)]
        pivot: Option<f64>,
    },
    /// Run the built-in property checks.
    Properties {
        /// Structured JSONL log output path (`-` for stdout).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Output report path (markdown); a JSON twin is written alongside.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Verify the core against reference fixtures (file or directory).
    Verify {
        #[arg(long, default_value = "tests/conformance")]
        fixture: PathBuf,
        /// Output report path (markdown); a JSON twin is written alongside.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log output path (`-` for stdout).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        #[arg(long)]
        log: PathBuf,
    },
}

fn run_id() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("run-{secs}")
}

fn is_stdout(path: &Path) -> bool {
    path == Path::new("-")
}

fn emitter(path: Option<&Path>, campaign: &str) -> std::io::Result<Option<LogEmitter>> {
    let run_id = run_id();
    match path {
        None => Ok(None),
        Some(p) if is_stdout(p) => Ok(Some(LogEmitter::to_stdout(campaign, &run_id))),
        Some(p) => LogEmitter::to_file(p, campaign, &run_id).map(Some),
    }
}

fn eval_failure(event: &str, err: &SqueezeError, details: serde_json::Value) -> LogEntry {
    let mut details = details;
    details["kind"] = serde_json::Value::from(err.kind());
    details["error"] = serde_json::Value::from(err.to_string());
    if let SqueezeError::Gamma(gamma_err) = err {
        details["failed_at"] = serde_json::Value::from(gamma_err.argument());
    }
    LogEntry::new("", LogLevel::Error, event)
        .with_stream(StreamKind::Eval)
        .with_outcome(Outcome::Error)
        .with_details(details)
}

fn write_or_print(path: Option<&Path>, body: &str) -> std::io::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, body)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}

fn log_results(
    log: &mut LogEmitter,
    stream: StreamKind,
    results: &[VerificationResult],
) -> std::io::Result<()> {
    for r in results {
        let (level, outcome) = if r.passed {
            (LogLevel::Info, Outcome::Pass)
        } else {
            (LogLevel::Error, Outcome::Fail)
        };
        let mut details = serde_json::json!({
            "case": r.case_name,
            "expected": r.expected,
            "actual": r.actual,
        });
        if let Some(diff) = &r.diff {
            details["diff"] = serde_json::Value::String(diff.clone());
        }
        log.emit_entry(
            LogEntry::new("", level, "check_result")
                .with_stream(stream)
                .with_check(&r.check)
                .with_mode(&r.mode)
                .with_outcome(outcome)
                .with_details(details),
        )?;
    }
    Ok(())
}

fn write_report(
    report_doc: &ConformanceReport,
    report: Option<&Path>,
    log: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(report_path) = report else {
        return Ok(());
    };
    if let Some(parent) = report_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(report_path, report_doc.to_markdown())?;
    let json_path = report_path.with_extension("json");
    std::fs::write(&json_path, report_doc.to_json())?;

    let mut index = ArtifactIndex::new(run_id());
    index.add_file(report_path, "report_markdown")?;
    index.add_file(&json_path, "report_json")?;
    if let Some(log_path) = log.filter(|p| !is_stdout(p)) {
        index.add_file(log_path, "log_jsonl")?;
    }
    let index_path = report_path.with_extension("artifacts.json");
    std::fs::write(&index_path, index.to_json()?)?;
    eprintln!(
        "Wrote report to {} (artifact index {})",
        report_path.display(),
        index_path.display()
    );
    Ok(())
}

/// Fixture sets under `path`, plus `(file, reason)` for files that failed to load.
fn load_fixtures(
    path: &Path,
) -> Result<(Vec<FixtureSet>, Vec<(String, String)>), Box<dyn std::error::Error>> {
    if path.is_file() {
        return Ok((vec![FixtureSet::from_file(path)?], Vec::new()));
    }
    let mut fixture_paths: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    fixture_paths.sort();

    let mut sets = Vec::new();
    let mut skipped = Vec::new();
    for fixture_path in fixture_paths {
        match FixtureSet::from_file(&fixture_path) {
            Ok(set) => sets.push(set),
            Err(err) => {
                eprintln!("Skipping {}: {}", fixture_path.display(), err);
                skipped.push((fixture_path.display().to_string(), err.to_string()));
            }
        }
    }
    if sets.is_empty() {
        return Err(format!("No fixture JSON files found in {}", path.display()).into());
    }
    Ok((sets, skipped))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = SqueezeConfig::from_env();

    match cli.command {
        Command::Eval { z, log } => {
            let evaluated = log_gamma(z);
            if let Some(mut emitter) = emitter(log.as_deref(), "eval")? {
                let entry = match evaluated {
                    Ok(value) => LogEntry::new("", LogLevel::Info, "log_gamma")
                        .with_stream(StreamKind::Eval)
                        .with_outcome(Outcome::Pass)
                        .with_details(serde_json::json!({ "z": z, "value": value })),
                    Err(err) => eval_failure(
                        "log_gamma",
                        &SqueezeError::from(err),
                        serde_json::json!({ "z": z }),
                    ),
                };
                emitter.emit_entry(entry)?;
                emitter.flush()?;
            }
            let value = evaluated?;
            let body = serde_json::json!({
                "z": z,
                "log_gamma": value,
                "gamma": gamma(z).ok(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Squeeze {
            pivot,
            offset,
            mode,
            log,
        } => {
            let mode = mode
                .as_deref()
                .map_or(config.mode, InputMode::from_str_loose);
            let offset = offset.unwrap_or(config.narrative_offset);
            let policy = HealingPolicy::new();
            let evaluated = guarded_squeeze(pivot, offset, mode, &policy);
            if let Some(mut emitter) = emitter(log.as_deref(), "eval")? {
                let entry = match &evaluated {
                    Ok((result, healing)) => {
                        let level = if result.stability().is_empty() {
                            LogLevel::Info
                        } else {
                            LogLevel::Warn
                        };
                        LogEntry::new("", level, "compute_squeeze")
                            .with_stream(StreamKind::Eval)
                            .with_mode(mode.as_str())
                            .with_point(result.pivot, result.offset)
                            .with_gap(result.gap)
                            .with_outcome(Outcome::Pass)
                            .with_details(serde_json::json!({ "healing": healing }))
                    }
                    Err(err) => eval_failure(
                        "compute_squeeze",
                        err,
                        serde_json::json!({ "pivot": pivot, "offset": offset }),
                    )
                    .with_mode(mode.as_str()),
                };
                emitter.emit_entry(entry)?;
                emitter.flush()?;
            }
            let (result, healing) = evaluated?;
            let body = serde_json::json!({
                "mode": mode,
                "result": result,
                "bounds": result.bounds(),
                "target_trapped": result.target_trapped(),
                "healing": healing,
                "warnings": result.stability(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Sweep {
            from,
            to,
            step,
            offset,
            format,
            output,
            log,
        } => {
            let from = from.unwrap_or(config.slider.min);
            let to = to.unwrap_or(config.slider.max);
            let step = step.unwrap_or(config.slider.step);
            let started = Instant::now();
            let report = convergence_sweep(from, to, step, offset)?;

            if let Some(mut log) = emitter(log.as_deref(), "sweep")? {
                for row in &report.rows {
                    let level = if row.warnings.is_empty() {
                        LogLevel::Debug
                    } else {
                        LogLevel::Warn
                    };
                    let entry = LogEntry::new("", level, "sweep_row")
                        .with_stream(StreamKind::Sweep)
                        .with_point(row.pivot, offset)
                        .with_gap(row.gap);
                    log.emit_entry(entry)?;
                }
                let outcome = if report.non_increasing {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                };
                log.emit_entry(
                    LogEntry::new("", LogLevel::Info, "sweep_complete")
                        .with_stream(StreamKind::Sweep)
                        .with_check("convergence")
                        .with_outcome(outcome)
                        .with_duration_ms(started.elapsed().as_millis() as u64)
                        .with_details(serde_json::json!({
                            "rows": report.rows.len(),
                            "unstable_rows": report.unstable_rows(),
                            "regressions": report.regressions,
                        })),
                )?;
                log.flush()?;
            }

            let body = match format.as_str() {
                "markdown" | "md" => report.to_markdown(),
                _ => report.to_json()?,
            };
            write_or_print(output.as_deref(), &body)?;
            if !report.non_increasing {
                return Err(format!("gap grew at pivots {:?}", report.regressions).into());
            }
        }
        Command::Curve { pivot, segments } => {
            let points = sample_window(pivot, segments)?;
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        Command::Walkthrough { transitions, pivot } => {
            let mut walkthrough = Walkthrough::new(config.slider);
            let mut states = Vec::new();
            for raw in &transitions {
                let transition = Transition::parse(raw)
                    .ok_or_else(|| format!("unknown transition '{raw}' (use next/back)"))?;
                let step = walkthrough.apply(transition);
                if let Some(value) = pivot {
                    walkthrough.set_pivot(value);
                }
                let result = walkthrough.evaluate()?;
                states.push(serde_json::json!({
                    "transition": transition,
                    "step": step,
                    "index": step.index(),
                    "title": step.title(),
                    "claim": step.claim(),
                    "shows_slopes": walkthrough.shows_slopes(),
                    "shows_trap": walkthrough.shows_trap(),
                    "pivot_adjustable": walkthrough.pivot_adjustable(),
                    "pivot": walkthrough.pivot(),
                    "gap": result.gap,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&states)?);
        }
        Command::Properties { log, report } => {
            let started = Instant::now();
            let summary = properties::run_all();
            if let Some(mut emitter) = emitter(log.as_deref(), "properties")? {
                log_results(&mut emitter, StreamKind::Property, &summary.results)?;
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Info, "properties_complete")
                        .with_stream(StreamKind::Property)
                        .with_duration_ms(started.elapsed().as_millis() as u64),
                )?;
                emitter.flush()?;
            }
            eprintln!(
                "Property checks: total={}, passed={}, failed={}",
                summary.total, summary.passed, summary.failed
            );
            let all_passed = summary.all_passed();
            let report_doc = ConformanceReport {
                title: String::from("Gamma squeeze property checks"),
                mode: String::from("strict"),
                timestamp: now_utc(),
                summary,
            };
            write_report(&report_doc, report.as_deref(), log.as_deref())?;
            if report.is_none() {
                println!("{}", report_doc.to_markdown());
            }
            if !all_passed {
                return Err("Property checks failed".into());
            }
        }
        Command::Verify {
            fixture,
            report,
            log,
            timestamp,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let (fixture_sets, skipped) = load_fixtures(&fixture)?;

            let strict_runner = TestRunner::new("fixture-verify", InputMode::Strict);
            let hardened_runner = TestRunner::new("fixture-verify", InputMode::Hardened);
            let mut results = Vec::new();
            for set in &fixture_sets {
                results.extend(strict_runner.run(set));
                results.extend(hardened_runner.run(set));
            }

            // Stabilize report ordering for reproducible output.
            results.sort_by(|a, b| {
                a.check
                    .cmp(&b.check)
                    .then_with(|| a.case_name.cmp(&b.case_name))
                    .then_with(|| a.mode.cmp(&b.mode))
            });

            if let Some(mut emitter) = emitter(log.as_deref(), "fixture-verify")? {
                for (path, reason) in &skipped {
                    emitter.emit_entry(
                        LogEntry::new("", LogLevel::Warn, "fixture_skipped")
                            .with_stream(StreamKind::Fixture)
                            .with_outcome(Outcome::Skip)
                            .with_details(serde_json::json!({ "path": path, "reason": reason })),
                    )?;
                }
                log_results(&mut emitter, StreamKind::Fixture, &results)?;
                emitter.flush()?;
            }

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("Gamma squeeze fixture conformance"),
                mode: String::from("strict+hardened"),
                timestamp: timestamp.unwrap_or_else(now_utc),
                summary,
            };
            eprintln!(
                "Verification complete: total={}, passed={}, failed={}, heals={}",
                report_doc.summary.total,
                report_doc.summary.passed,
                report_doc.summary.failed,
                hardened_runner.heals_applied()
            );
            write_report(&report_doc, report.as_deref(), log.as_deref())?;

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!("{}: {lines} line(s), {} error(s)", log.display(), errors.len());
            if !errors.is_empty() {
                return Err("Log validation failed".into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        let argv = std::iter::once("gamma-squeeze-harness").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn negative_numbers_parse_as_values() {
        match parse(&["curve", "--pivot", "-0.5"]) {
            Command::Curve { pivot, segments } => {
                assert_eq!(pivot, -0.5);
                assert_eq!(segments, CURVE_SEGMENTS);
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse(&["sweep", "--from", "-3", "--to", "-1", "--offset", "-0.2"]) {
            Command::Sweep {
                from, to, offset, ..
            } => {
                assert_eq!(from, Some(-3.0));
                assert_eq!(to, Some(-1.0));
                assert_eq!(offset, -0.2);
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse(&["walkthrough", "--pivot", "-4"]) {
            Command::Walkthrough { pivot, transitions } => {
                assert_eq!(pivot, Some(-4.0));
                assert_eq!(transitions, ["next", "next", "next"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dash_log_targets_stdout() {
        match parse(&["eval", "--z", "-1.5", "--log", "-"]) {
            Command::Eval { z, log } => {
                assert_eq!(z, -1.5);
                assert!(log.as_deref().is_some_and(is_stdout));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(emitter(Some(Path::new("-")), "eval").unwrap().is_some());
        assert!(emitter(None, "eval").unwrap().is_none());
    }

    #[test]
    fn squeeze_failures_carry_the_failing_abscissa() {
        let err = gamma_squeeze_core::compute_squeeze(1.0, 0.5).unwrap_err();
        let entry = eval_failure("compute_squeeze", &err, serde_json::json!({ "pivot": 1.0 }));
        assert_eq!(entry.outcome, Some(Outcome::Error));
        assert_eq!(entry.stream, Some(StreamKind::Eval));
        let details = entry.details.unwrap();
        assert_eq!(details["kind"], "domain");
        assert_eq!(details["failed_at"], 0.0);
        assert_eq!(details["pivot"], 1.0);
    }
}
