//! Error types for the seasadj-filters crate.

use crate::finite::Causality;

/// Error type for all fallible operations in the seasadj-filters crate.
///
/// Every variant is deterministic: it reflects either an invalid filter
/// specification or a buffer that cannot hold the requested window.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FilterError {
    /// Returned when an even length is given where an odd one is required.
    #[error("invalid filter length {length}: must be odd and at least {min}")]
    InvalidLength {
        /// Length that was requested.
        length: usize,
        /// Smallest accepted length.
        min: usize,
    },

    /// Returned when the filter window does not fit the supplied buffers.
    #[error("filter of length {filter} cannot map {input} inputs onto {output} outputs")]
    Length {
        /// Number of input observations.
        input: usize,
        /// Number of output slots.
        output: usize,
        /// Filter length.
        filter: usize,
    },

    /// Returned when a one-sided application meets weight on the wrong side.
    #[error("filter with bounds [{lower}, {upper}] is not {direction:?}")]
    Bounds {
        /// Lower bound of the offending filter.
        lower: i32,
        /// Upper bound of the offending filter.
        upper: i32,
        /// Direction that was requested.
        direction: Causality,
    },

    /// Returned when a filter parameter is out of its domain.
    #[error("invalid filter parameter: {reason}")]
    InvalidParameter {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a kernel, end-point strategy or preset name is unknown.
    #[error("unsupported {kind}: {name}")]
    UnsupportedName {
        /// What kind of name was parsed.
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// Returned when a local-polynomial or constrained end-point system is singular.
    #[error("singular {size}x{size} system while deriving filter weights")]
    SingularSystem {
        /// Dimension of the linear system.
        size: usize,
    },
}
