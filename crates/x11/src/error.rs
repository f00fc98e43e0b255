//! Error types for the seasadj-x11 crate.

use seasadj_extremes::ExtremesError;
use seasadj_filters::FilterError;

/// Error type for all fallible operations in the seasadj-x11 crate.
///
/// Any error aborts the whole decomposition; no partial result is returned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum X11Error {
    /// Returned when the configuration is inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a multiplicative trend estimate is not strictly positive.
    #[error("non-positive trend {value} at index {index} in table {stage}")]
    NegativeTrend {
        /// Table holding the trend estimate.
        stage: &'static str,
        /// Index of the offending observation.
        index: usize,
        /// The offending trend value.
        value: f64,
    },

    /// Returned when the series cannot support the configured filters.
    #[error("series too short: {len} observations, need at least {min}")]
    SeriesTooShort {
        /// Number of observations supplied.
        len: usize,
        /// Minimum number of observations.
        min: usize,
    },

    /// Returned when the input contains NaN or infinity.
    #[error("non-finite value at index {index}")]
    NonFiniteData {
        /// Index of the first non-finite observation.
        index: usize,
    },

    /// Wrapped filter error with the table being computed.
    #[error("filter error in table {stage}: {source}")]
    Filter {
        /// Table being computed.
        stage: &'static str,
        /// Underlying filter error.
        source: FilterError,
    },

    /// Wrapped error from the extreme value corrector.
    #[error(transparent)]
    Extremes(#[from] ExtremesError),
}
