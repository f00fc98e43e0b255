//! Statistical helper functions and decomposition-mode algebra for seasadj.
//!
//! All helpers treat `NaN` as a missing observation and skip it.

mod mode;

pub use mode::DecompositionMode;

/// Arithmetic mean of the finite values of a slice. Returns `NaN` if none.
pub fn mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Root mean square deviation of the finite values from a fixed `center`.
///
/// This is the X11 irregular "sigma": deviations are measured from the
/// theoretical centre of the irregular (1 or 0), not from the sample mean.
/// Returns `None` when no finite value is present.
pub fn rms_about(data: &[f64], center: f64) -> Option<f64> {
    let (ssq, count) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), &v| {
            let d = v - center;
            (s + d * d, c + 1)
        });
    if count == 0 {
        return None;
    }
    Some((ssq / count as f64).sqrt())
}

/// Mean absolute lag-`lag` change of a series under the given mode.
///
/// Multiplicative changes are relative (`|x[t] / x[t-lag] - 1|`), additive
/// changes are plain differences. Pairs involving `NaN` are skipped.
/// Returns `None` when no pair is available.
pub fn mean_abs_change(data: &[f64], lag: usize, mode: DecompositionMode) -> Option<f64> {
    if lag == 0 || data.len() <= lag {
        return None;
    }
    let (sum, count) = data
        .iter()
        .zip(&data[lag..])
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .fold((0.0, 0usize), |(s, c), (&prev, &cur)| {
            (s + mode.deviation(mode.remove_value(cur, prev)).abs(), c + 1)
        });
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}
