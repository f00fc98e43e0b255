//! Centred symmetric filters.

use crate::error::FilterError;
use crate::finite::FiniteFilter;

/// Tolerance used to accept user-supplied weights as symmetric.
const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// A centred filter with `lower_bound = -upper_bound` and `w(i) = w(-i)`.
///
/// Only constructible through validated constructors, so the symmetry
/// invariant holds for every instance.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricFilter {
    filter: FiniteFilter,
}

impl SymmetricFilter {
    /// Builds a filter from its non-negative half: `half[k]` is the weight at
    /// lags `k` and `-k`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidLength`] if `half` is empty and
    /// [`FilterError::InvalidParameter`] if a weight is not finite.
    pub fn from_half(half: &[f64]) -> Result<Self, FilterError> {
        if half.is_empty() {
            return Err(FilterError::InvalidLength { length: 0, min: 1 });
        }
        if let Some(k) = half.iter().position(|w| !w.is_finite()) {
            return Err(FilterError::InvalidParameter {
                reason: format!("weight at lag {k} is not finite"),
            });
        }
        Ok(Self {
            filter: mirror_half(half),
        })
    }

    /// Builds a filter from all of its weights, lowest lag first.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`FilterError::InvalidLength`] | even or zero length |
    /// | [`FilterError::InvalidParameter`] | weights are not symmetric or not finite |
    pub fn from_weights(weights: &[f64]) -> Result<Self, FilterError> {
        if weights.len() % 2 == 0 {
            return Err(FilterError::InvalidLength {
                length: weights.len(),
                min: 1,
            });
        }
        let n = weights.len();
        for i in 0..n / 2 {
            if (weights[i] - weights[n - 1 - i]).abs() > SYMMETRY_TOLERANCE {
                return Err(FilterError::InvalidParameter {
                    reason: format!(
                        "weights at lags {} and {} differ",
                        i as i64 - (n / 2) as i64,
                        (n / 2 - i) as i64
                    ),
                });
            }
        }
        Self::from_half(&weights[n / 2..])
    }

    /// Checks that a finite filter is symmetric and wraps it.
    pub fn try_from_filter(filter: &FiniteFilter) -> Result<Self, FilterError> {
        if filter.lower_bound() != -filter.upper_bound() {
            return Err(FilterError::InvalidParameter {
                reason: format!(
                    "bounds [{}, {}] are not centred",
                    filter.lower_bound(),
                    filter.upper_bound()
                ),
            });
        }
        Self::from_weights(filter.weights())
    }

    /// Half-length `m`; the filter spans lags `-m..=m`.
    pub fn half_length(&self) -> usize {
        self.filter.upper_bound() as usize
    }

    /// Number of weights, `2m + 1`.
    pub fn len(&self) -> usize {
        self.filter.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Weight at `lag` (zero outside the span).
    pub fn weight(&self, lag: i32) -> f64 {
        self.filter.weight(lag)
    }

    /// Dense weights from `-m` to `m`.
    pub fn weights(&self) -> &[f64] {
        self.filter.weights()
    }

    /// The underlying finite filter.
    pub fn as_filter(&self) -> &FiniteFilter {
        &self.filter
    }

    /// Sum of the weights.
    pub fn sum(&self) -> f64 {
        self.filter.sum()
    }

    /// Composes two symmetric filters; the result is symmetric again.
    pub fn compose(&self, other: &SymmetricFilter) -> SymmetricFilter {
        let product = &self.filter * &other.filter;
        let m = product.upper_bound() as usize;
        SymmetricFilter {
            filter: mirror_half(&product.weights()[m..]),
        }
    }
}

/// Expands a non-empty half `[w0, w1, .., wm]` into `[wm, .., w1, w0, w1, .., wm]`.
fn mirror_half(half: &[f64]) -> FiniteFilter {
    let m = half.len() - 1;
    let weights: Vec<f64> = half
        .iter()
        .rev()
        .chain(half.iter().skip(1))
        .copied()
        .collect();
    FiniteFilter::from_parts(-(m as i32), weights)
}

impl AsRef<FiniteFilter> for SymmetricFilter {
    fn as_ref(&self) -> &FiniteFilter {
        &self.filter
    }
}
