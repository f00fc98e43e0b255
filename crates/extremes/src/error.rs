//! Error types for the seasadj-extremes crate.

/// Error type for all fallible operations in the seasadj-extremes crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtremesError {
    /// Returned when the series to analyse is empty.
    #[error("series too short: {len} observations, need at least {min}")]
    SeriesTooShort {
        /// Number of observations supplied.
        len: usize,
        /// Minimum number of observations.
        min: usize,
    },

    /// Returned when the seasonal period is zero.
    #[error("seasonal period must be >= 1, got {period}")]
    InvalidPeriod {
        /// The invalid period.
        period: usize,
    },

    /// Returned when the start offset is not inside the first cycle.
    #[error("start offset {start} must be smaller than the period {period}")]
    InvalidStart {
        /// The invalid start offset.
        start: usize,
        /// The seasonal period.
        period: usize,
    },

    /// Returned when the sigma window spans no full cycle.
    #[error("sigma window must span >= 1 cycle, got {nperiods}")]
    InvalidWindow {
        /// The invalid number of cycles.
        nperiods: usize,
    },

    /// Returned when the sigma limits do not satisfy `0 < lower < upper`.
    #[error("sigma limits must satisfy 0 < lower < upper, got lower={lower}, upper={upper}")]
    InvalidSigma {
        /// Lower sigma limit.
        lower: f64,
        /// Upper sigma limit.
        upper: f64,
    },

    /// Returned when a series does not match the analysed one.
    #[error("series length {got} does not match the analysed length {expected}")]
    LengthMismatch {
        /// Length of the analysed series.
        expected: usize,
        /// Length of the supplied series.
        got: usize,
    },
}
