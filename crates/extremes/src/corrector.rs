//! Extreme value detection and correction.
//!
//! ```text
//! analyse(data)
//!   ├─ block_sigmas()      one sigma per year block (nperiods-year window)
//!   ├─ detect()            weights in [0, 1]
//!   └─ if any weight < 1:  null flagged points, block_sigmas(), detect()
//! ExtremeValues::compute_corrections(si)
//!   ├─ 2 + 2 clean same-position neighbours → weighted average
//!   └─ otherwise           mean of the clean values at that position
//! ```

use seasadj_stats::{DecompositionMode, rms_about};
use tracing::{debug, warn};

use crate::error::ExtremesError;

/// Smallest sigma used for detection; keeps perfectly smooth irregulars
/// from flagging rounding noise.
pub const MIN_SIGMA: f64 = 1e-10;

/// Configuration of the extreme value corrector.
///
/// # Example
///
/// ```
/// use seasadj_extremes::ExtremeValuesCorrector;
///
/// let corrector = ExtremeValuesCorrector::new(12).with_sigma_limits(1.5, 2.5);
/// assert!(corrector.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeValuesCorrector {
    period: usize,
    start: usize,
    mode: DecompositionMode,
    lower_sigma: f64,
    upper_sigma: f64,
    nperiods: usize,
}

impl ExtremeValuesCorrector {
    /// Creates a corrector for series with the given period.
    ///
    /// Defaults: `start = 0`, multiplicative mode, sigma limits 1.5 / 2.5,
    /// sigma window of 5 cycles.
    pub fn new(period: usize) -> Self {
        Self {
            period,
            start: 0,
            mode: DecompositionMode::Multiplicative,
            lower_sigma: 1.5,
            upper_sigma: 2.5,
            nperiods: 5,
        }
    }

    /// Sets the index of the first observation of the first complete cycle.
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Sets the decomposition mode.
    pub fn with_mode(mut self, mode: DecompositionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the lower and upper sigma limits.
    pub fn with_sigma_limits(mut self, lower: f64, upper: f64) -> Self {
        self.lower_sigma = lower;
        self.upper_sigma = upper;
        self
    }

    /// Sets the number of cycles used for each sigma estimate.
    pub fn with_nperiods(mut self, nperiods: usize) -> Self {
        self.nperiods = nperiods;
        self
    }

    /// Returns the seasonal period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Returns the start offset.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the decomposition mode.
    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    /// Returns the lower sigma limit.
    pub fn lower_sigma(&self) -> f64 {
        self.lower_sigma
    }

    /// Returns the upper sigma limit.
    pub fn upper_sigma(&self) -> f64 {
        self.upper_sigma
    }

    /// Returns the sigma window in cycles.
    pub fn nperiods(&self) -> usize {
        self.nperiods
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ExtremesError::InvalidPeriod`] | `period == 0` |
    /// | [`ExtremesError::InvalidStart`] | `start >= period` |
    /// | [`ExtremesError::InvalidWindow`] | `nperiods == 0` |
    /// | [`ExtremesError::InvalidSigma`] | not `0 < lower < upper` |
    pub fn validate(&self) -> Result<(), ExtremesError> {
        if self.period == 0 {
            return Err(ExtremesError::InvalidPeriod {
                period: self.period,
            });
        }
        if self.start >= self.period {
            return Err(ExtremesError::InvalidStart {
                start: self.start,
                period: self.period,
            });
        }
        if self.nperiods == 0 {
            return Err(ExtremesError::InvalidWindow {
                nperiods: self.nperiods,
            });
        }
        if !(self.lower_sigma > 0.0 && self.lower_sigma < self.upper_sigma)
            || !self.upper_sigma.is_finite()
        {
            return Err(ExtremesError::InvalidSigma {
                lower: self.lower_sigma,
                upper: self.upper_sigma,
            });
        }
        Ok(())
    }

    /// Assigns an outlier weight to every observation of `data`.
    ///
    /// `data` is an irregular-like series centred on 1 (multiplicative) or
    /// 0 (additive). Missing values get weight 1.
    ///
    /// # Errors
    ///
    /// Returns the [`validate`](Self::validate) errors, or
    /// [`ExtremesError::SeriesTooShort`] for an empty series.
    #[tracing::instrument(level = "debug", skip(self, data), fields(n = data.len(), period = self.period))]
    pub fn analyse(&self, data: &[f64]) -> Result<ExtremeValues, ExtremesError> {
        self.validate()?;
        if data.is_empty() {
            return Err(ExtremesError::SeriesTooShort { len: 0, min: 1 });
        }
        let mut sigmas = self.block_sigmas(data);
        let mut weights = self.detect(data, &sigmas);
        let first_pass = weights.iter().filter(|&&w| w < 1.0).count();
        if first_pass > 0 {
            let cleaned: Vec<f64> = data
                .iter()
                .zip(&weights)
                .map(|(&x, &w)| if w < 1.0 { f64::NAN } else { x })
                .collect();
            sigmas = self.block_sigmas(&cleaned);
            weights = self.detect(data, &sigmas);
        }
        let extremes = weights.iter().filter(|&&w| w < 1.0).count();
        debug!(first_pass, extremes, "extreme values detected");
        Ok(ExtremeValues {
            data: data.to_vec(),
            weights,
            sigmas,
            period: self.period,
            mode: self.mode,
        })
    }

    /// One sigma per observation, taken from its year block.
    fn block_sigmas(&self, data: &[f64]) -> Vec<f64> {
        let n = data.len();
        let center = self.mode.center();
        let global = rms_about(data, center).map_or(MIN_SIGMA, |s| s.max(MIN_SIGMA));
        let full_years = n.saturating_sub(self.start) / self.period;
        if full_years < self.nperiods {
            warn!(
                full_years,
                nperiods = self.nperiods,
                "too few complete cycles, using a global sigma"
            );
            return vec![global; n];
        }
        let year_sigma: Vec<f64> = (0..full_years)
            .map(|y| {
                let first = y
                    .saturating_sub(self.nperiods / 2)
                    .min(full_years - self.nperiods);
                let lo = self.start + first * self.period;
                let hi = lo + self.nperiods * self.period;
                rms_about(&data[lo..hi], center).map_or(global, |s| s.max(MIN_SIGMA))
            })
            .collect();
        (0..n)
            .map(|i| {
                let y = i.saturating_sub(self.start) / self.period;
                year_sigma[y.min(full_years - 1)]
            })
            .collect()
    }

    fn detect(&self, data: &[f64], sigmas: &[f64]) -> Vec<f64> {
        data.iter()
            .zip(sigmas)
            .map(|(&x, &s)| {
                if !x.is_finite() {
                    return 1.0;
                }
                let dev = self.mode.deviation(x).abs();
                let lower = self.lower_sigma * s;
                let upper = self.upper_sigma * s;
                if dev <= lower {
                    1.0
                } else if dev >= upper {
                    0.0
                } else {
                    (upper - dev) / (upper - lower)
                }
            })
            .collect()
    }
}

impl Default for ExtremeValuesCorrector {
    fn default() -> Self {
        Self::new(12)
    }
}

/// Outcome of [`ExtremeValuesCorrector::analyse`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeValues {
    data: Vec<f64>,
    weights: Vec<f64>,
    sigmas: Vec<f64>,
    period: usize,
    mode: DecompositionMode,
}

impl ExtremeValues {
    /// The analysed series.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Observation weights: 1 = regular, 0 = fully suppressed.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sigma applied to each observation in the final detection pass.
    pub fn sigmas(&self) -> &[f64] {
        &self.sigmas
    }

    /// Number of observations with weight below 1.
    pub fn extreme_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w < 1.0).count()
    }

    /// Computes replacement values of `si` for every down-weighted
    /// observation.
    ///
    /// With two clean (weight 1) observations at the same seasonal position
    /// on each side, the replacement is `(w x + Σ neighbours) / (w + 4)`.
    /// Otherwise it is the mean of all clean observations at that position.
    ///
    /// # Errors
    ///
    /// Returns [`ExtremesError::LengthMismatch`] if `si` does not match the
    /// analysed series.
    pub fn compute_corrections(&self, si: &[f64]) -> Result<Corrections, ExtremesError> {
        let n = self.data.len();
        if si.len() != n {
            return Err(ExtremesError::LengthMismatch {
                expected: n,
                got: si.len(),
            });
        }
        let p = self.period;
        let clean = |j: usize| self.weights[j] >= 1.0 && si[j].is_finite();
        let position_mean: Vec<Option<f64>> = (0..p.min(n))
            .map(|pos| {
                let (sum, count) = (pos..n)
                    .step_by(p)
                    .filter(|&j| clean(j))
                    .fold((0.0, 0usize), |(s, c), j| (s + si[j], c + 1));
                (count > 0).then(|| sum / count as f64)
            })
            .collect();

        let mut values = vec![f64::NAN; n];
        let (mut fallback, mut uncorrected) = (0usize, 0usize);
        for i in (0..n).filter(|&i| self.weights[i] < 1.0) {
            let before: Vec<usize> = (0..i / p)
                .map(|k| i - (k + 1) * p)
                .filter(|&j| clean(j))
                .take(2)
                .collect();
            let after: Vec<usize> = (1..)
                .map(|k| i + k * p)
                .take_while(|&j| j < n)
                .filter(|&j| clean(j))
                .take(2)
                .collect();
            if before.len() == 2 && after.len() == 2 {
                let (w, x) = if si[i].is_finite() {
                    (self.weights[i], si[i])
                } else {
                    (0.0, 0.0)
                };
                let neighbours: f64 = before.iter().chain(&after).map(|&j| si[j]).sum();
                values[i] = (w * x + neighbours) / (w + 4.0);
            } else if let Some(m) = position_mean[i % p] {
                values[i] = m;
                fallback += 1;
            } else {
                uncorrected += 1;
            }
        }
        if uncorrected > 0 {
            warn!(uncorrected, "no clean observation at the seasonal position, values kept");
        }
        debug!(fallback, "seasonal-position means used for corrections");
        Ok(Corrections {
            values,
            mode: self.mode,
        })
    }

    /// Irregular replacement factors `I / (1 + w (I - 1))` (multiplicative)
    /// or `(1 - w) I` (additive), treating the analysed series as `I`.
    pub fn irregular_factors(&self) -> Vec<f64> {
        self.data
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| {
                if x.is_finite() {
                    self.mode.remove_value(x, self.mode.shrink(x, w))
                } else {
                    self.mode.center()
                }
            })
            .collect()
    }
}

/// Replacement values produced by [`ExtremeValues::compute_corrections`].
#[derive(Debug, Clone, PartialEq)]
pub struct Corrections {
    values: Vec<f64>,
    mode: DecompositionMode,
}

impl Corrections {
    /// Replacement values; `NaN` where nothing is replaced.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of replaced observations.
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// `si` with the replacements substituted.
    ///
    /// # Errors
    ///
    /// Returns [`ExtremesError::LengthMismatch`] for a series of another length.
    pub fn apply(&self, si: &[f64]) -> Result<Vec<f64>, ExtremesError> {
        self.check(si)?;
        Ok(si
            .iter()
            .zip(&self.values)
            .map(|(&x, &c)| if c.is_finite() { c } else { x })
            .collect())
    }

    /// Factors separating each observation of `si` from its replacement;
    /// the neutral value where nothing is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ExtremesError::LengthMismatch`] for a series of another length.
    pub fn factors(&self, si: &[f64]) -> Result<Vec<f64>, ExtremesError> {
        self.check(si)?;
        Ok(si
            .iter()
            .zip(&self.values)
            .map(|(&x, &c)| {
                if c.is_finite() {
                    self.mode.remove_value(x, c)
                } else {
                    self.mode.center()
                }
            })
            .collect())
    }

    fn check(&self, si: &[f64]) -> Result<(), ExtremesError> {
        if si.len() != self.values.len() {
            return Err(ExtremesError::LengthMismatch {
                expected: self.values.len(),
                got: si.len(),
            });
        }
        Ok(())
    }
}
