//! Configuration of an X11 decomposition run.

use seasadj_filters::{EndPointMethod, Kernel, SeasonalFilterOption};
use seasadj_stats::DecompositionMode;

use crate::error::X11Error;

/// Length of the final trend filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLength {
    /// Fixed odd number of terms.
    Fixed(usize),
    /// Chosen per step from the I/C ratio of the preliminary adjusted series.
    Auto,
}

impl Default for TrendLength {
    fn default() -> Self {
        Self::Fixed(13)
    }
}

/// Immutable configuration of one decomposition.
///
/// # Example
///
/// ```
/// use seasadj_filters::{EndPointMethod, SeasonalFilterOption};
/// use seasadj_stats::DecompositionMode;
/// use seasadj_x11::{TrendLength, X11Config};
///
/// let config = X11Config::new(DecompositionMode::Additive, 12.0)
///     .with_trend_length(TrendLength::Fixed(23))
///     .with_end_points(Some(EndPointMethod::Daf), Some(EndPointMethod::Lc))
///     .with_final_seasonal(SeasonalFilterOption::S3x9);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct X11Config {
    mode: DecompositionMode,
    period: f64,
    trend_length: TrendLength,
    kernel: Kernel,
    degree: usize,
    left_end_points: Option<EndPointMethod>,
    right_end_points: Option<EndPointMethod>,
    initial_seasonal: SeasonalFilterOption,
    final_seasonal: SeasonalFilterOption,
    lower_sigma: f64,
    upper_sigma: f64,
}

impl X11Config {
    /// Creates a configuration for the given mode and period.
    ///
    /// Defaults: 13-term Henderson trend (degree 3), LC end points on both
    /// sides, S3x3 / S3x5 seasonal filters, sigma limits 1.5 / 2.5.
    pub fn new(mode: DecompositionMode, period: f64) -> Self {
        Self {
            mode,
            period,
            trend_length: TrendLength::default(),
            kernel: Kernel::Henderson,
            degree: 3,
            left_end_points: Some(EndPointMethod::Lc),
            right_end_points: Some(EndPointMethod::Lc),
            initial_seasonal: SeasonalFilterOption::S3x3,
            final_seasonal: SeasonalFilterOption::S3x5,
            lower_sigma: 1.5,
            upper_sigma: 2.5,
        }
    }

    /// Sets the decomposition mode.
    pub fn with_mode(mut self, mode: DecompositionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the period.
    pub fn with_period(mut self, period: f64) -> Self {
        self.period = period;
        self
    }

    /// Sets the trend filter length.
    pub fn with_trend_length(mut self, length: TrendLength) -> Self {
        self.trend_length = length;
        self
    }

    /// Sets the trend kernel.
    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the local polynomial degree of the trend filter.
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Sets the end-point methods; `None` leaves that end of the trend
    /// undefined.
    pub fn with_end_points(
        mut self,
        left: Option<EndPointMethod>,
        right: Option<EndPointMethod>,
    ) -> Self {
        self.left_end_points = left;
        self.right_end_points = right;
        self
    }

    /// Sets the seasonal filter of the preliminary estimates (tables 4 and 5).
    pub fn with_initial_seasonal(mut self, option: SeasonalFilterOption) -> Self {
        self.initial_seasonal = option;
        self
    }

    /// Sets the seasonal filter of the final estimates (tables 9 and 10).
    pub fn with_final_seasonal(mut self, option: SeasonalFilterOption) -> Self {
        self.final_seasonal = option;
        self
    }

    /// Sets both seasonal filters.
    pub fn with_seasonal(self, option: SeasonalFilterOption) -> Self {
        self.with_initial_seasonal(option).with_final_seasonal(option)
    }

    /// Sets the sigma limits of the extreme value corrector.
    pub fn with_sigma_limits(mut self, lower: f64, upper: f64) -> Self {
        self.lower_sigma = lower;
        self.upper_sigma = upper;
        self
    }

    /// Returns the decomposition mode.
    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    /// Returns the period.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Period rounded to whole observations, the stride of seasonal
    /// positions.
    pub fn seasonal_stride(&self) -> usize {
        self.period.round() as usize
    }

    /// Returns the trend filter length.
    pub fn trend_length(&self) -> TrendLength {
        self.trend_length
    }

    /// Returns the trend kernel.
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Returns the local polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the end-point method at the start of the series.
    pub fn left_end_points(&self) -> Option<EndPointMethod> {
        self.left_end_points
    }

    /// Returns the end-point method at the end of the series.
    pub fn right_end_points(&self) -> Option<EndPointMethod> {
        self.right_end_points
    }

    /// Returns the preliminary seasonal filter option.
    pub fn initial_seasonal(&self) -> SeasonalFilterOption {
        self.initial_seasonal
    }

    /// Returns the final seasonal filter option.
    pub fn final_seasonal(&self) -> SeasonalFilterOption {
        self.final_seasonal
    }

    /// Returns the lower sigma limit.
    pub fn lower_sigma(&self) -> f64 {
        self.lower_sigma
    }

    /// Returns the upper sigma limit.
    pub fn upper_sigma(&self) -> f64 {
        self.upper_sigma
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`X11Error::InvalidConfiguration`] if the period is not finite
    /// or below 2, a fixed trend length is even or below 3, the degree
    /// exceeds 3, or the sigma limits do not satisfy `0 < lower < upper`.
    pub fn validate(&self) -> Result<(), X11Error> {
        if !self.period.is_finite() || self.period < 2.0 {
            return Err(X11Error::InvalidConfiguration {
                reason: format!("period must be finite and >= 2, got {}", self.period),
            });
        }
        if let TrendLength::Fixed(len) = self.trend_length {
            if len % 2 == 0 || len < 3 {
                return Err(X11Error::InvalidConfiguration {
                    reason: format!("trend length must be odd and >= 3, got {len}"),
                });
            }
        }
        if self.degree > 3 {
            return Err(X11Error::InvalidConfiguration {
                reason: format!("local polynomial degree must be <= 3, got {}", self.degree),
            });
        }
        if !(self.lower_sigma > 0.0 && self.lower_sigma < self.upper_sigma)
            || !self.upper_sigma.is_finite()
        {
            return Err(X11Error::InvalidConfiguration {
                reason: format!(
                    "sigma limits must satisfy 0 < lower < upper, got lower={}, upper={}",
                    self.lower_sigma, self.upper_sigma
                ),
            });
        }
        Ok(())
    }
}

impl Default for X11Config {
    fn default() -> Self {
        Self::new(DecompositionMode::Multiplicative, 12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = X11Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trend_length(), TrendLength::Fixed(13));
        assert_eq!(config.seasonal_stride(), 12);
        assert_eq!(config.initial_seasonal(), SeasonalFilterOption::S3x3);
        assert_eq!(config.final_seasonal(), SeasonalFilterOption::S3x5);
    }

    #[test]
    fn sigma_limits_out_of_order() {
        let config = X11Config::default().with_sigma_limits(2.5, 1.5);
        assert!(matches!(
            config.validate(),
            Err(X11Error::InvalidConfiguration { .. })
        ));
        let config = X11Config::default().with_sigma_limits(0.0, 1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn even_trend_length_rejected() {
        let config = X11Config::default().with_trend_length(TrendLength::Fixed(12));
        assert!(config.validate().is_err());
    }

    #[test]
    fn period_must_be_at_least_two() {
        assert!(X11Config::default().with_period(1.0).validate().is_err());
        assert!(X11Config::default().with_period(f64::NAN).validate().is_err());
        assert!(X11Config::default().with_period(12.5).validate().is_ok());
    }

    #[test]
    fn fractional_period_rounds_stride() {
        let config = X11Config::default().with_period(52.18);
        assert_eq!(config.seasonal_stride(), 52);
    }
}
