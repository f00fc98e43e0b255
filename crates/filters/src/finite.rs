//! Finite linear filters: dense weights over a contiguous lag range.

use std::ops::{Add, Mul, Neg, Sub};

use crate::error::FilterError;
use crate::polynomial::{add_aligned, convolve};

/// Magnitude below which [`FiniteFilter::smooth`] zeroes a coefficient.
pub const SMOOTHING_EPSILON: f64 = 1e-6;

/// A lag-to-weight mapping.
///
/// Only meaningful inside the bounds of the filter that owns it. Closures
/// `Fn(i32) -> f64` implement it, so generic kernels can be sampled with
/// [`FiniteFilter::from_fn`] once and then applied from the dense array.
pub trait WeightFunction {
    /// Weight at the given lag.
    fn weight(&self, lag: i32) -> f64;
}

impl<F: Fn(i32) -> f64> WeightFunction for F {
    fn weight(&self, lag: i32) -> f64 {
        self(lag)
    }
}

/// Direction of a one-sided (causal) filter application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Causality {
    /// Uses only current and past observations (`upper_bound <= 0`).
    Backward,
    /// Uses only current and future observations (`lower_bound >= 0`).
    Forward,
}

/// A finite impulse response filter.
///
/// `weights[k]` is the weight at lag `lower_bound + k`; the filter value at
/// position `t` is `Σ_j w(j) x[t + j]`. Filters are immutable values: the
/// arithmetic operators and [`mirror`](Self::mirror) return new filters.
#[derive(Clone, Debug, PartialEq)]
pub struct FiniteFilter {
    lower: i32,
    weights: Vec<f64>,
}

impl FiniteFilter {
    /// Creates a filter from its lower bound and dense weights.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`FilterError::InvalidLength`] | `weights` is empty |
    /// | [`FilterError::InvalidParameter`] | a weight is not finite |
    pub fn new(lower: i32, weights: Vec<f64>) -> Result<Self, FilterError> {
        if weights.is_empty() {
            return Err(FilterError::InvalidLength { length: 0, min: 1 });
        }
        if let Some(pos) = weights.iter().position(|w| !w.is_finite()) {
            return Err(FilterError::InvalidParameter {
                reason: format!("weight at lag {} is not finite", lower + pos as i32),
            });
        }
        Ok(Self { lower, weights })
    }

    /// Samples a weight function over `[lower, upper]`.
    pub fn from_fn(lower: i32, upper: i32, f: impl WeightFunction) -> Result<Self, FilterError> {
        if upper < lower {
            return Err(FilterError::InvalidParameter {
                reason: format!("upper bound {upper} below lower bound {lower}"),
            });
        }
        Self::new(lower, (lower..=upper).map(|j| f.weight(j)).collect())
    }

    /// Wraps weights that are already known to be non-empty and finite.
    pub(crate) fn from_parts(lower: i32, weights: Vec<f64>) -> Self {
        debug_assert!(!weights.is_empty());
        Self { lower, weights }
    }

    /// The identity filter (weight 1 at lag 0).
    pub fn identity() -> Self {
        Self {
            lower: 0,
            weights: vec![1.0],
        }
    }

    /// Lowest lag carrying a weight.
    pub fn lower_bound(&self) -> i32 {
        self.lower
    }

    /// Highest lag carrying a weight.
    pub fn upper_bound(&self) -> i32 {
        self.lower + self.weights.len() as i32 - 1
    }

    /// Number of weights, `upper_bound - lower_bound + 1`.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`; a filter has at least one weight.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Dense weights from `lower_bound` to `upper_bound`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at `lag`, zero outside the bounds.
    pub fn weight(&self, lag: i32) -> f64 {
        if lag < self.lower || lag > self.upper_bound() {
            return 0.0;
        }
        self.weights[(lag - self.lower) as usize]
    }

    /// Sum of the weights (1 for a filter that preserves constants).
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Reflects the filter: the weight at lag `-i` becomes the weight at `i`.
    pub fn mirror(&self) -> Self {
        let mut weights = self.weights.clone();
        weights.reverse();
        Self {
            lower: -self.upper_bound(),
            weights,
        }
    }

    /// Rescales the weights so that they sum to one.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`] if the weights sum to zero.
    pub fn normalized(&self) -> Result<Self, FilterError> {
        let s = self.sum();
        if s.abs() < 1e-12 {
            return Err(FilterError::InvalidParameter {
                reason: format!(
                    "weights on [{}, {}] sum to zero",
                    self.lower,
                    self.upper_bound()
                ),
            });
        }
        Ok(self * (1.0 / s))
    }

    /// Zeroes coefficients smaller than [`SMOOTHING_EPSILON`] and drops
    /// leading and trailing zeros.
    ///
    /// A filter whose weights all vanish collapses to a single zero weight at
    /// its former lower bound.
    pub fn smooth(&self) -> Self {
        let cleaned: Vec<f64> = self
            .weights
            .iter()
            .map(|&w| if w.abs() < SMOOTHING_EPSILON { 0.0 } else { w })
            .collect();
        let Some(first) = cleaned.iter().position(|&w| w != 0.0) else {
            return Self {
                lower: self.lower,
                weights: vec![0.0],
            };
        };
        let last = cleaned.iter().rposition(|&w| w != 0.0).unwrap_or(first);
        Self {
            lower: self.lower + first as i32,
            weights: cleaned[first..=last].to_vec(),
        }
    }

    /// Filter value at `pos`, or `None` when the window leaves the input.
    pub fn value_at(&self, input: &[f64], pos: usize) -> Option<f64> {
        let start = pos as i64 + self.lower as i64;
        let end = pos as i64 + self.upper_bound() as i64;
        if start < 0 || end >= input.len() as i64 {
            return None;
        }
        let start = start as usize;
        Some(dot(&self.weights, &input[start..start + self.weights.len()]))
    }

    /// Applies the filter to `input`, writing into `output`.
    ///
    /// * `output.len() == input.len() - len + 1`: contracting mode,
    ///   `out[i] = Σ_j w(j) in[i - lower + j]`.
    /// * `output.len() == input.len()`: extended mode; the window of every
    ///   output position is shifted against the nearest boundary so each
    ///   output is a full-length weighted sum.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Length`] when `input` is shorter than the
    /// filter or `output` matches neither mode.
    pub fn apply(&self, input: &[f64], output: &mut [f64]) -> Result<(), FilterError> {
        let n = input.len();
        let len = self.weights.len();
        let err = || FilterError::Length {
            input: n,
            output: output.len(),
            filter: len,
        };
        if n < len {
            return Err(err());
        }
        if output.len() == n {
            let max_start = (n - len) as i64;
            for (i, out) in output.iter_mut().enumerate() {
                let start = (i as i64 + self.lower as i64).clamp(0, max_start) as usize;
                *out = dot(&self.weights, &input[start..start + len]);
            }
            Ok(())
        } else if output.len() == n - len + 1 {
            for (i, out) in output.iter_mut().enumerate() {
                *out = dot(&self.weights, &input[i..i + len]);
            }
            Ok(())
        } else {
            Err(err())
        }
    }

    /// Contracting application: returns `input.len() - len + 1` values.
    pub fn filter(&self, input: &[f64]) -> Result<Vec<f64>, FilterError> {
        let n = input.len();
        if n < self.len() {
            return Err(FilterError::Length {
                input: n,
                output: 0,
                filter: self.len(),
            });
        }
        let mut out = vec![0.0; n - self.len() + 1];
        self.apply(input, &mut out)?;
        Ok(out)
    }

    /// Extended application: one value per input value.
    pub fn filter_extended(&self, input: &[f64]) -> Result<Vec<f64>, FilterError> {
        let mut out = vec![0.0; input.len()];
        self.apply(input, &mut out)?;
        Ok(out)
    }

    /// One-sided application aligned on the input.
    ///
    /// Positions whose window is not complete are `NaN`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Bounds`] if the filter has weight on the side
    /// that `direction` excludes.
    pub fn apply_causal(
        &self,
        input: &[f64],
        direction: Causality,
    ) -> Result<Vec<f64>, FilterError> {
        let one_sided = match direction {
            Causality::Backward => self.upper_bound() <= 0,
            Causality::Forward => self.lower >= 0,
        };
        if !one_sided {
            return Err(FilterError::Bounds {
                lower: self.lower,
                upper: self.upper_bound(),
                direction,
            });
        }
        Ok((0..input.len())
            .map(|i| self.value_at(input, i).unwrap_or(f64::NAN))
            .collect())
    }
}

#[inline]
fn dot(w: &[f64], x: &[f64]) -> f64 {
    w.iter().zip(x).map(|(a, b)| a * b).sum()
}

impl Add for &FiniteFilter {
    type Output = FiniteFilter;

    /// Bounds of the sum are the union of the operands' bounds.
    fn add(self, rhs: &FiniteFilter) -> FiniteFilter {
        let lower = self.lower.min(rhs.lower);
        let mut a = vec![0.0; (self.lower - lower) as usize];
        a.extend_from_slice(&self.weights);
        let mut b = vec![0.0; (rhs.lower - lower) as usize];
        b.extend_from_slice(&rhs.weights);
        FiniteFilter {
            lower,
            weights: add_aligned(&a, &b),
        }
    }
}

impl Neg for &FiniteFilter {
    type Output = FiniteFilter;

    fn neg(self) -> FiniteFilter {
        self * -1.0
    }
}

impl Sub for &FiniteFilter {
    type Output = FiniteFilter;

    fn sub(self, rhs: &FiniteFilter) -> FiniteFilter {
        self + &(-rhs)
    }
}

impl Mul<f64> for &FiniteFilter {
    type Output = FiniteFilter;

    fn mul(self, rhs: f64) -> FiniteFilter {
        FiniteFilter {
            lower: self.lower,
            weights: self.weights.iter().map(|w| w * rhs).collect(),
        }
    }
}

impl Mul for &FiniteFilter {
    type Output = FiniteFilter;

    /// Composition of two filters: the weights convolve and the bounds add.
    fn mul(self, rhs: &FiniteFilter) -> FiniteFilter {
        FiniteFilter {
            lower: self.lower + rhs.lower,
            weights: convolve(&self.weights, &rhs.weights),
        }
    }
}
