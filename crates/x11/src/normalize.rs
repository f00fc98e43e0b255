//! Seasonal normalisation.
//!
//! Raw seasonal estimates drift with the level of the seasonal-irregular
//! ratios; normalising removes that drift so the factors average to the
//! neutral value over any full cycle.

use seasadj_filters::centered_moving_average;
use seasadj_stats::DecompositionMode;

use crate::error::X11Error;

/// Turns a raw seasonal estimate into seasonal factors.
pub trait SeasonalNormalizer: Send + Sync {
    /// Normalises `seasonal`, returning a series of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`X11Error`] if the normalising filter cannot be built.
    fn normalize(
        &self,
        seasonal: &[f64],
        mode: DecompositionMode,
        period: f64,
    ) -> Result<Vec<f64>, X11Error>;
}

/// Removes a centred `period`-term moving average from the seasonal
/// estimate.
///
/// Where the average is undefined near the ends of the defined range the
/// first or last defined average is repeated. `NaN` inputs stay `NaN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenteredNormalizer;

impl SeasonalNormalizer for CenteredNormalizer {
    fn normalize(
        &self,
        seasonal: &[f64],
        mode: DecompositionMode,
        period: f64,
    ) -> Result<Vec<f64>, X11Error> {
        let mut out = vec![f64::NAN; seasonal.len()];
        let Some(first) = seasonal.iter().position(|v| v.is_finite()) else {
            return Ok(out);
        };
        let last = seasonal.iter().rposition(|v| v.is_finite()).unwrap_or(first);
        let defined = &seasonal[first..=last];

        let ma = centered_moving_average(period).map_err(|source| X11Error::Filter {
            stage: "normalize",
            source,
        })?;
        let level = if defined.len() >= ma.len() {
            let inner = ma
                .as_filter()
                .filter(defined)
                .map_err(|source| X11Error::Filter {
                    stage: "normalize",
                    source,
                })?;
            let h = ma.half_length();
            let head = inner.first().copied().unwrap_or(f64::NAN);
            let tail = inner.last().copied().unwrap_or(f64::NAN);
            let mut level = vec![head; h];
            level.extend_from_slice(&inner);
            level.resize(defined.len(), tail);
            level
        } else {
            vec![seasadj_stats::mean(defined); defined.len()]
        };

        for ((slot, &s), &m) in out[first..=last].iter_mut().zip(defined).zip(&level) {
            *slot = mode.remove_value(s, m);
        }
        Ok(out)
    }
}
