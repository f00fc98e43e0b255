//! Input validation and behaviour on short series.

use seasadj_filters::EndPointMethod;
use seasadj_stats::DecompositionMode;
use seasadj_x11::{TrendLength, X11Config, X11Decomposer, X11Error, decompose};

fn monthly(n: usize) -> Vec<f64> {
    (0..n)
        .map(|t| (100.0 + t as f64) * (1.0 + 0.1 * (t as f64 * std::f64::consts::PI / 6.0).sin()))
        .collect()
}

/// 25 monthly points with end filters: the trend covers every position.
#[test]
fn short_series_trend_is_complete() {
    let result = decompose(&monthly(25), &X11Config::default()).unwrap();
    assert_eq!(result.trend().len(), 25);
    assert!(result.trend().iter().all(|v| v.is_finite()));
    assert!(result.seasonally_adjusted().iter().all(|v| v.is_finite()));
}

/// Without end filters the trend is undefined at the first and last six
/// positions, and so is the irregular.
#[test]
fn disabled_end_filters_leave_trend_ends_undefined() {
    let config = X11Config::default().with_end_points(None, None);
    let result = decompose(&monthly(25), &config).unwrap();
    let trend = result.trend();
    assert!(trend[..6].iter().all(|v| v.is_nan()));
    assert!(trend[19..].iter().all(|v| v.is_nan()));
    assert!(trend[6..19].iter().all(|v| v.is_finite()));
    assert!(result.irregular()[..6].iter().all(|v| v.is_nan()));
    assert!(result.seasonal().iter().all(|v| v.is_finite()));
}

/// Short quarterly trend filters build end filters under every method.
#[test]
fn quarterly_short_trends_support_every_end_point_method() {
    let series: Vec<f64> = (0..48)
        .map(|t| (100.0 + 0.5 * t as f64) * [1.1, 0.95, 0.9, 1.05][t % 4])
        .collect();
    for length in [TrendLength::Fixed(3), TrendLength::Fixed(5), TrendLength::Auto] {
        for method in [
            EndPointMethod::Lc,
            EndPointMethod::Ql,
            EndPointMethod::Cq,
            EndPointMethod::Cc,
            EndPointMethod::Daf,
            EndPointMethod::Cn,
        ] {
            let config = X11Config::new(DecompositionMode::Multiplicative, 4.0)
                .with_trend_length(length)
                .with_end_points(Some(method), Some(method));
            let result = decompose(&series, &config)
                .unwrap_or_else(|e| panic!("{length:?} with {method:?}: {e}"));
            assert!(result.trend().iter().all(|v| v.is_finite()));
        }
    }
}

/// Fewer observations than the centred average plus a year is rejected.
#[test]
fn too_short_series_is_rejected() {
    let err = decompose(&monthly(20), &X11Config::default()).unwrap_err();
    assert!(matches!(err, X11Error::SeriesTooShort { len: 20, min: 24 }));
}

/// A trend filter longer than the series is rejected up front.
#[test]
fn trend_longer_than_series_is_rejected() {
    let config = X11Config::default().with_trend_length(TrendLength::Fixed(31));
    let err = decompose(&monthly(25), &config).unwrap_err();
    assert!(matches!(err, X11Error::SeriesTooShort { len: 25, min: 31 }));
}

/// NaN in the input is reported with its index.
#[test]
fn non_finite_input_is_rejected() {
    let mut series = monthly(48);
    series[10] = f64::NAN;
    let err = decompose(&series, &X11Config::default()).unwrap_err();
    assert!(matches!(err, X11Error::NonFiniteData { index: 10 }));
}

/// A series crossing zero has no multiplicative decomposition.
#[test]
fn non_positive_trend_is_rejected() {
    let series: Vec<f64> = (0..72).map(|t| 100.0 - 2.0 * t as f64).collect();
    let err = decompose(&series, &X11Config::default()).unwrap_err();
    assert!(matches!(err, X11Error::NegativeTrend { stage: "b2", .. }));
}

/// The same series decomposes additively.
#[test]
fn additive_mode_accepts_sign_changes() {
    let series: Vec<f64> = (0..72)
        .map(|t| 100.0 - 2.0 * t as f64 + if t % 12 < 6 { 3.0 } else { -3.0 })
        .collect();
    let config = X11Config::new(DecompositionMode::Additive, 12.0);
    assert!(decompose(&series, &config).is_ok());
}

/// Invalid configurations are rejected before any work is done.
#[test]
fn invalid_configuration_is_rejected() {
    let config = X11Config::default().with_sigma_limits(3.0, 2.0);
    assert!(matches!(
        X11Decomposer::new(config),
        Err(X11Error::InvalidConfiguration { .. })
    ));
    let config = X11Config::default().with_period(1.5);
    assert!(matches!(
        decompose(&monthly(48), &config),
        Err(X11Error::InvalidConfiguration { .. })
    ));
}
