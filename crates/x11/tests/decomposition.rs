//! End-to-end decomposition of synthetic monthly and quarterly series.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use seasadj_filters::EndPointMethod;
use seasadj_stats::DecompositionMode;
use seasadj_x11::{Step, Table, X11Config, X11Decomposer, decompose};

const MONTHLY: [f64; 12] = [
    0.85, 0.88, 0.95, 1.0, 1.05, 1.12, 1.18, 1.15, 1.04, 0.98, 0.92, 0.88,
];

fn multiplicative_series(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|t| {
            let noise: f64 = rng.sample(StandardNormal);
            (200.0 + 0.8 * t as f64) * MONTHLY[t % 12] * (1.0 + 0.01 * noise)
        })
        .collect()
}

fn additive_series(n: usize, seed: u64) -> Vec<f64> {
    let pattern = [12.0, -4.0, 6.0, -14.0];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|t| {
            let noise: f64 = rng.sample(StandardNormal);
            50.0 - 0.3 * t as f64 + pattern[t % 4] + noise
        })
        .collect()
}

/// Trend × seasonal × irregular reproduces the input at every position.
#[test]
fn multiplicative_components_reconstruct_series() {
    let series = multiplicative_series(144, 7);
    let result = decompose(&series, &X11Config::default()).unwrap();
    assert_eq!(result.len(), 144);
    for (t, &x) in series.iter().enumerate() {
        let rebuilt = result.trend()[t] * result.seasonal()[t] * result.irregular()[t];
        assert_abs_diff_eq!(rebuilt, x, epsilon = 1e-8);
        assert_abs_diff_eq!(
            result.seasonally_adjusted()[t] * result.seasonal()[t],
            x,
            epsilon = 1e-8
        );
    }
}

/// Trend + seasonal + irregular reproduces the input at every position.
#[test]
fn additive_components_reconstruct_series() {
    let series = additive_series(80, 11);
    let config = X11Config::new(DecompositionMode::Additive, 4.0);
    let result = decompose(&series, &config).unwrap();
    for (t, &x) in series.iter().enumerate() {
        let rebuilt = result.trend()[t] + result.seasonal()[t] + result.irregular()[t];
        assert_abs_diff_eq!(rebuilt, x, epsilon = 1e-9);
    }
}

/// A known seasonal pattern is recovered away from the ends.
#[test]
fn recovers_seasonal_pattern() {
    let series = multiplicative_series(144, 3);
    let result = decompose(&series, &X11Config::default()).unwrap();
    for t in 36..108 {
        assert_abs_diff_eq!(result.seasonal()[t], MONTHLY[t % 12], epsilon = 0.02);
    }
}

/// Multiplicative seasonal factors average to one over a year.
#[test]
fn seasonal_factors_are_normalised() {
    let series = multiplicative_series(120, 5);
    let result = decompose(&series, &X11Config::default()).unwrap();
    for start in (24..84).step_by(12) {
        let year: f64 = result.seasonal()[start..start + 12].iter().sum::<f64>() / 12.0;
        assert_abs_diff_eq!(year, 1.0, epsilon = 0.01);
    }
}

/// Two runs on the same input agree bit for bit.
#[test]
fn decomposition_is_deterministic() {
    let series = multiplicative_series(96, 21);
    let decomposer = X11Decomposer::new(X11Config::default()).unwrap();
    let first = decomposer.decompose(&series).unwrap();
    let second = decomposer.decompose(&series).unwrap();
    for &table in Table::ALL {
        let a: Vec<u64> = first.table(table).iter().map(|v| v.to_bits()).collect();
        let b: Vec<u64> = second.table(table).iter().map(|v| v.to_bits()).collect();
        assert_eq!(a, b, "table {}", table.name());
    }
}

/// Every table has the input length and the C step starts from the
/// corrected series.
#[test]
fn tables_are_full_length() {
    let series = multiplicative_series(96, 8);
    let result = decompose(&series, &X11Config::default()).unwrap();
    for &table in Table::ALL {
        assert_eq!(result.table(table).len(), 96, "table {}", table.name());
    }
    assert_eq!(result.table(Table::B1), series.as_slice());
    for t in 0..96 {
        assert_abs_diff_eq!(
            result.table(Table::C1)[t] * result.table(Table::B20)[t],
            series[t],
            epsilon = 1e-9
        );
    }
    assert!(result.weights().iter().all(|w| (0.0..=1.0).contains(w)));
}

/// A large outlier is down-weighted in the final irregular.
#[test]
fn outlier_gets_zero_weight() {
    let mut series = multiplicative_series(120, 13);
    series[63] *= 1.3;
    let result = decompose(&series, &X11Config::default()).unwrap();
    assert_eq!(result.weights()[63], 0.0);
    assert!(result.corrections()[63] > 1.2);
    assert!(result.step(Step::B).get(seasadj_x11::TableKind::Weights)[63] < 1.0);
}

/// Fractional periods use an exact centred average and a rounded stride.
#[test]
fn fractional_period_decomposes() {
    let series = multiplicative_series(130, 17);
    let config = X11Config::default().with_period(12.5);
    let result = decompose(&series, &config).unwrap();
    for (t, &x) in series.iter().enumerate() {
        let rebuilt = result.trend()[t] * result.seasonal()[t] * result.irregular()[t];
        assert_abs_diff_eq!(rebuilt, x, epsilon = 1e-8);
    }
}

/// Different end-point methods only change the ends of the trend.
#[test]
fn end_point_method_is_configurable() {
    let series = additive_series(80, 19);
    for method in [
        EndPointMethod::Lc,
        EndPointMethod::Ql,
        EndPointMethod::Cq,
        EndPointMethod::Cc,
        EndPointMethod::Daf,
        EndPointMethod::Cn,
    ] {
        let config = X11Config::new(DecompositionMode::Additive, 4.0)
            .with_end_points(Some(method), Some(method));
        let result = decompose(&series, &config).unwrap();
        assert!(
            result.trend().iter().all(|v| v.is_finite()),
            "method {}",
            method.name()
        );
    }
}
