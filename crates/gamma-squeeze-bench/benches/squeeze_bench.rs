//! Squeeze model benchmarks.
//!
//! Measures per-call cost of the log-gamma engine and of one full squeeze
//! evaluation, per input mode.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gamma_squeeze_core::{
    CURVE_SEGMENTS, HealingPolicy, InputMode, SliderPolicy, compute_squeeze, guarded_squeeze,
    log_gamma, sample_window,
};

#[derive(Default)]
struct BenchStats {
    samples_ns_per_op: Vec<f64>,
    total_iters: u64,
    total_ns: u128,
}

impl BenchStats {
    fn record(&mut self, iters: u64, dur: Duration) {
        let ns = dur.as_nanos();
        self.total_iters = self.total_iters.saturating_add(iters);
        self.total_ns = self.total_ns.saturating_add(ns);
        self.samples_ns_per_op.push(ns as f64 / iters as f64);
    }

    fn report(&self, bench_label: &str) {
        let mut samples = self.samples_ns_per_op.clone();
        if samples.is_empty() {
            return;
        }
        samples.sort_by(f64::total_cmp);

        let p50 = percentile_sorted(&samples, 0.50);
        let p95 = percentile_sorted(&samples, 0.95);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let throughput_ops_s = if self.total_ns == 0 {
            0.0
        } else {
            (self.total_iters as f64) / (self.total_ns as f64 / 1e9)
        };

        println!(
            "SQUEEZE_BENCH bench={} samples={} p50_ns_op={:.3} p95_ns_op={:.3} mean_ns_op={:.3} throughput_ops_s={:.3}",
            bench_label,
            samples.len(),
            p50,
            p95,
            mean,
            throughput_ops_s
        );
    }
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&p));
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn bench_log_gamma(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_gamma");
    group.throughput(Throughput::Elements(1));

    // Reflection branch, near one, slider range, far tail.
    for z in [-2.5, 0.25, 1.5, 7.5, 150.0] {
        let stats = RefCell::new(BenchStats::default());
        group.bench_with_input(BenchmarkId::from_parameter(z), &z, |b, &z| {
            b.iter_custom(|iters| {
                let start = Instant::now();
                for _ in 0..iters {
                    black_box(log_gamma(black_box(z)).ok());
                }
                let dur = start.elapsed().max(Duration::from_nanos(1));
                stats.borrow_mut().record(iters, dur);
                dur
            });
        });
        stats.borrow().report(&format!("log_gamma/{z}"));
    }

    group.finish();
}

fn bench_squeeze(c: &mut Criterion) {
    let positions = SliderPolicy {
        step: 1.0,
        ..SliderPolicy::default()
    }
    .positions();

    let mut group = c.benchmark_group("squeeze");
    group.throughput(Throughput::Elements(positions.len() as u64));

    group.bench_function("compute_squeeze/slider", |b| {
        b.iter(|| {
            for &pivot in &positions {
                black_box(compute_squeeze(black_box(pivot), 0.5).ok());
            }
        });
    });

    for mode in [InputMode::Strict, InputMode::Hardened] {
        let policy = HealingPolicy::new();
        group.bench_function(BenchmarkId::new("guarded_squeeze", mode.as_str()), |b| {
            b.iter(|| {
                for &pivot in &positions {
                    black_box(guarded_squeeze(black_box(pivot), 0.5, mode, &policy).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve");
    group.throughput(Throughput::Elements(CURVE_SEGMENTS as u64 + 1));
    for pivot in [2.0, 15.0] {
        group.bench_with_input(BenchmarkId::new("sample_window", pivot), &pivot, |b, &p| {
            b.iter(|| black_box(sample_window(black_box(p), CURVE_SEGMENTS).ok()));
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(100))
        .measurement_time(Duration::from_secs(2))
        .sample_size(50);
    targets = bench_log_gamma, bench_squeeze, bench_curve
);
criterion_main!(benches);
