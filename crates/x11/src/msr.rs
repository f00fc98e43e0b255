//! Moving seasonality ratio and the seasonal filter it selects.

use seasadj_filters::{SeasonalFilter, SeasonalFilterOption, SeasonalMovingAverage};
use seasadj_stats::{DecompositionMode, mean_abs_change};
use tracing::{debug, warn};

use crate::error::X11Error;

/// Maximum number of trailing years dropped while the ratio stays ambiguous.
const MAX_RETRIES: usize = 5;

/// Moving seasonality ratio `Σ|ΔI| / Σ|ΔS|` over year-to-year changes.
///
/// Changes are relative in multiplicative mode. Returns `None` when either
/// component has no usable pair or the seasonal never changes.
pub fn moving_seasonality_ratio(
    seasonal: &[f64],
    irregular: &[f64],
    mode: DecompositionMode,
    stride: usize,
) -> Option<f64> {
    let i = mean_abs_change(irregular, stride, mode)?;
    let s = mean_abs_change(seasonal, stride, mode)?;
    (s > 0.0).then(|| i / s)
}

/// Seasonal filter for a moving seasonality ratio, `None` when the ratio
/// falls in an ambiguous band.
///
/// | MSR | Filter |
/// |-----|--------|
/// | `< 2.5` | S3x3 |
/// | `3.5 ..= 5.5` | S3x5 |
/// | `> 6.5` | S3x9 |
pub fn filter_for_ratio(msr: f64) -> Option<SeasonalFilterOption> {
    if msr < 2.5 {
        Some(SeasonalFilterOption::S3x3)
    } else if (3.5..=5.5).contains(&msr) {
        Some(SeasonalFilterOption::S3x5)
    } else if msr > 6.5 {
        Some(SeasonalFilterOption::S3x9)
    } else {
        None
    }
}

/// Outcome of the moving-seasonality selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MsrSelection {
    /// Selected seasonal filter.
    pub option: SeasonalFilterOption,
    /// Ratio that decided the selection, if one could be computed.
    pub ratio: Option<f64>,
}

/// Selects the final seasonal filter from the seasonal-irregular ratios.
///
/// A preliminary S3x3 seasonal separates `si` into seasonal and irregular
/// parts. While the ratio is ambiguous the last year is dropped and the
/// ratio recomputed, at most five times; S3x5 is the fallback.
///
/// # Errors
///
/// Returns [`X11Error::Filter`] if the preliminary seasonal filter fails.
pub fn select_seasonal_filter(
    si: &[f64],
    mode: DecompositionMode,
    stride: usize,
) -> Result<MsrSelection, X11Error> {
    let s3x3 = SeasonalMovingAverage::s3x(3)
        .map(SeasonalFilter::MovingAverage)
        .map_err(|source| X11Error::Filter { stage: "msr", source })?;
    let mut len = si.len();
    let mut last_ratio = None;
    for attempt in 0..=MAX_RETRIES {
        if len < 2 * stride {
            break;
        }
        let window = &si[..len];
        let seasonal = s3x3
            .apply(window, stride)
            .map_err(|source| X11Error::Filter { stage: "msr", source })?;
        let irregular = mode.remove(window, &seasonal);
        let ratio = moving_seasonality_ratio(&seasonal, &irregular, mode, stride);
        last_ratio = ratio.or(last_ratio);
        if let Some(option) = ratio.and_then(filter_for_ratio) {
            debug!(ratio, attempt, option = option.name(), "moving seasonality ratio");
            return Ok(MsrSelection { option, ratio });
        }
        len -= stride;
    }
    warn!(ratio = last_ratio, "ambiguous moving seasonality ratio, using S3x5");
    Ok(MsrSelection {
        option: SeasonalFilterOption::S3x5,
        ratio: last_ratio,
    })
}
