//! Adaptive seasonal filter and trend length selection.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use seasadj_filters::SeasonalFilterOption;
use seasadj_x11::{Step, TrendLength, X11Config, decompose};

fn noisy(n: usize, seed: u64, noise_sd: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|t| {
            let e: f64 = rng.sample(StandardNormal);
            let seasonal = 1.0 + 0.15 * (t as f64 * std::f64::consts::PI / 6.0).cos();
            (500.0 + 2.0 * t as f64) * seasonal * (1.0 + noise_sd * e)
        })
        .collect()
}

/// The moving seasonality ratio picks one of the standard filters.
#[test]
fn msr_selects_a_standard_filter() {
    let series = noisy(144, 31, 0.02);
    let config = X11Config::default().with_final_seasonal(SeasonalFilterOption::Msr);
    let result = decompose(&series, &config).unwrap();
    for step in [Step::B, Step::C] {
        let tables = result.step(step);
        assert!(matches!(
            tables.seasonal_filter(),
            SeasonalFilterOption::S3x3 | SeasonalFilterOption::S3x5 | SeasonalFilterOption::S3x9
        ));
    }
    assert!(result.step(Step::C).msr().is_some());
}

/// Fixed seasonal options are reported as used.
#[test]
fn fixed_seasonal_option_is_reported() {
    let series = noisy(120, 41, 0.01);
    let config = X11Config::default().with_seasonal(SeasonalFilterOption::Stable);
    let result = decompose(&series, &config).unwrap();
    assert_eq!(
        result.step(Step::C).seasonal_filter(),
        SeasonalFilterOption::Stable
    );
    assert_eq!(result.step(Step::C).msr(), None);
    // a stable filter gives the same factor every year
    for t in 24..96 {
        assert_abs_diff_eq!(result.seasonal()[t], result.seasonal()[t + 12], epsilon = 1e-9);
    }
}

/// Automatic trend length stays within the monthly candidates.
#[test]
fn auto_trend_length_uses_monthly_candidates() {
    for (seed, sd) in [(43, 0.001), (47, 0.05)] {
        let series = noisy(120, seed, sd);
        let config = X11Config::default().with_trend_length(TrendLength::Auto);
        let result = decompose(&series, &config).unwrap();
        for step in [Step::B, Step::C] {
            assert!(matches!(result.step(step).trend_length(), 9 | 13 | 23));
        }
    }
}

/// A smooth series gets a short trend filter, a noisy one a long filter.
#[test]
fn auto_trend_length_follows_noise_level() {
    let config = X11Config::default().with_trend_length(TrendLength::Auto);
    let smooth = decompose(&noisy(120, 53, 0.0005), &config).unwrap();
    let rough = decompose(&noisy(120, 59, 0.08), &config).unwrap();
    assert_eq!(smooth.step(Step::B).trend_length(), 9);
    assert_eq!(rough.step(Step::B).trend_length(), 23);
}
