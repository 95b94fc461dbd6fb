//! Integration test: convexity and convergence properties of the squeeze.
//!
//! Run: cargo test -p gamma-squeeze-core --test squeeze_properties_test

use std::f64::consts::PI;

use gamma_squeeze_core::{
    GammaError, SliderPolicy, SqueezeError, compute_squeeze, log_gamma, sample_window,
};

fn rel_close(actual: f64, expected: f64, tol: f64) -> bool {
    (actual - expected).abs() <= tol * expected.abs()
}

#[test]
fn reflection_consistency_below_one_half() {
    let mut z = 0.005;
    while z < 0.5 {
        let lhs = log_gamma(z).unwrap() + log_gamma(1.0 - z).unwrap();
        let rhs = PI.ln() - (PI * z).sin().ln();
        assert!(rel_close(lhs, rhs, 1e-9), "z={z}: {lhs} vs {rhs}");
        z += 0.0125;
    }
}

#[test]
fn known_values() {
    assert!(log_gamma(1.0).unwrap().abs() < 1e-10);
    assert!(log_gamma(2.0).unwrap().abs() < 1e-10);
    assert!((log_gamma(6.0).unwrap() - 4.787_491_742_782_046).abs() < 1e-10);
    assert!((log_gamma(0.5).unwrap() - 0.572_364_942_924_700_1).abs() < 1e-10);
}

#[test]
fn ten_significant_digits_on_reference_grid() {
    // ln Γ(n) = ln((n-1)!) for integers, exact to double precision here.
    let mut ln_factorial = 0.0_f64;
    for n in 2..=20 {
        ln_factorial += f64::from(n - 1).ln();
        let got = log_gamma(f64::from(n)).unwrap();
        assert!(
            (got - ln_factorial).abs() <= 1e-10 * ln_factorial.abs().max(1.0),
            "n={n}: {got} vs {ln_factorial}"
        );
    }
    // Half-integers: Γ(n + 1/2) = (2n)! √π / (4^n n!)
    let cases = [
        (1.5, -0.120_782_237_635_245_43),
        (2.5, 0.284_682_870_472_919_6),
        (7.5, 7.534_364_236_758_734),
        (12.5, 18.734_347_511_936_45),
    ];
    for (z, expected) in cases {
        let got = log_gamma(z).unwrap();
        assert!(
            (got - expected).abs() <= 1e-10 * expected.abs().max(1.0),
            "z={z}: {got} vs {expected}"
        );
    }
}

#[test]
fn discrete_convexity_on_integers() {
    for n in 2..=50 {
        let n = f64::from(n);
        let left = log_gamma(n).unwrap() - log_gamma(n - 1.0).unwrap();
        let right = log_gamma(n + 1.0).unwrap() - log_gamma(n).unwrap();
        assert!(left <= right, "n={n}: {left} > {right}");
    }
}

#[test]
fn bound_ordering_over_slider_grid() {
    let slider = SliderPolicy {
        min: 2.0,
        max: 15.0,
        step: 0.5,
    };
    for pivot in slider.positions() {
        for offset in [0.1, 0.5, 0.9] {
            let r = compute_squeeze(pivot, offset).unwrap();
            assert!(r.lower_slope <= r.upper_slope, "pivot={pivot}");
            assert!(r.lower_bound_y <= r.upper_bound_y, "pivot={pivot}");
            assert!(r.gap >= 0.0);
            assert!(r.target_trapped(), "pivot={pivot} offset={offset}");
        }
    }
}

#[test]
fn gap_converges_as_pivot_grows() {
    let gap = |p: f64| compute_squeeze(p, 0.5).unwrap().gap;
    assert!(gap(2.0) > gap(15.0));

    let samples = [2.0, 5.0, 10.0, 15.0];
    for w in samples.windows(2) {
        assert!(gap(w[1]) <= gap(w[0]), "{} -> {}", w[0], w[1]);
    }

    // Continuous slider motion keeps the trend.
    let mut previous = f64::INFINITY;
    for pivot in SliderPolicy::default().positions() {
        let g = gap(pivot);
        assert!(g <= previous, "pivot={pivot}");
        previous = g;
    }
}

#[test]
fn domain_and_range_rejection() {
    for z in [0.0, -1.0, -2.0] {
        assert_eq!(log_gamma(z), Err(GammaError::Domain { z }));
    }
    assert_eq!(
        compute_squeeze(5.0, 0.0),
        Err(SqueezeError::Range { offset: 0.0 })
    );
    assert_eq!(
        compute_squeeze(5.0, 1.0),
        Err(SqueezeError::Range { offset: 1.0 })
    );
}

#[test]
fn end_to_end_pivot_two() {
    let r = compute_squeeze(2.0, 0.5).unwrap();
    assert!(r.lower_slope.abs() < 1e-10);
    assert!((r.upper_slope - 0.693_147_180_559_945_3).abs() < 1e-10);
    assert!(r.lower_bound_y.abs() < 1e-10);
    assert!((r.upper_bound_y - 0.346_573_590_279_972_6).abs() < 1e-10);
    assert!((r.gap - 0.346_573_590_279_972_6).abs() < 1e-10);
}

#[test]
fn repeated_evaluation_is_idempotent_across_threads() {
    let expected = compute_squeeze(7.3, 0.4).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| compute_squeeze(7.3, 0.4).unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn curve_window_contains_squeeze_points() {
    let pts = sample_window(4.0, 8).unwrap();
    let r = compute_squeeze(4.0, 0.5).unwrap();
    // segments of width 0.5 starting at 2.5 hit 3.0, 4.0, 4.5 and 5.0 exactly
    for point in [r.prev, r.curr, r.target, r.next] {
        assert!(
            pts.iter()
                .any(|p| (p.x - point.x).abs() < 1e-12 && (p.y - point.y).abs() < 1e-12),
            "{point:?}"
        );
    }
}
