//! Trend filters: a symmetric interior filter plus optional end filters.

use std::hash::{Hash, Hasher};

use crate::endpoints::{EndFilters, EndPointMethod, Side, end_filters};
use crate::error::FilterError;
use crate::henderson::henderson;
use crate::kernel::Kernel;
use crate::local_polynomial::local_polynomial;
use crate::symmetric::SymmetricFilter;

/// Symmetric trend filter with independently optional end filters.
///
/// Without end filters the first and last `h` outputs are `NaN`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrendFilter {
    symmetric: SymmetricFilter,
    left: Option<EndFilters>,
    right: Option<EndFilters>,
}

impl TrendFilter {
    /// Trend filter without end filters.
    pub fn new(symmetric: SymmetricFilter) -> Self {
        Self {
            symmetric,
            left: None,
            right: None,
        }
    }

    /// Attaches end filters for the start of the series.
    ///
    /// Right-side filters are mirrored automatically.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`] if the horizon does not match
    /// the half-length of the symmetric filter.
    pub fn with_left(mut self, ends: EndFilters) -> Result<Self, FilterError> {
        self.check_horizon(&ends)?;
        self.left = Some(match ends.side() {
            Side::Left => ends,
            Side::Right => ends.mirrored(),
        });
        Ok(self)
    }

    /// Attaches end filters for the end of the series.
    ///
    /// Left-side filters are mirrored automatically.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`] if the horizon does not match
    /// the half-length of the symmetric filter.
    pub fn with_right(mut self, ends: EndFilters) -> Result<Self, FilterError> {
        self.check_horizon(&ends)?;
        self.right = Some(match ends.side() {
            Side::Right => ends,
            Side::Left => ends.mirrored(),
        });
        Ok(self)
    }

    fn check_horizon(&self, ends: &EndFilters) -> Result<(), FilterError> {
        if ends.horizon() != self.symmetric.half_length() {
            return Err(FilterError::InvalidParameter {
                reason: format!(
                    "{} end filters for a symmetric filter of half-length {}",
                    ends.horizon(),
                    self.symmetric.half_length()
                ),
            });
        }
        Ok(())
    }

    /// Interior filter.
    pub fn symmetric(&self) -> &SymmetricFilter {
        &self.symmetric
    }

    /// End filters for the start of the series, if any.
    pub fn left(&self) -> Option<&EndFilters> {
        self.left.as_ref()
    }

    /// End filters for the end of the series, if any.
    pub fn right(&self) -> Option<&EndFilters> {
        self.right.as_ref()
    }

    /// Length of the interior filter.
    pub fn len(&self) -> usize {
        self.symmetric.len()
    }

    /// Always `false`; a trend filter has at least one term.
    pub fn is_empty(&self) -> bool {
        self.symmetric.is_empty()
    }

    /// Filters `input`, returning one value per input value.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Length`] if `input` is shorter than the
    /// interior filter.
    pub fn apply(&self, input: &[f64]) -> Result<Vec<f64>, FilterError> {
        let n = input.len();
        let len = self.symmetric.len();
        if n < len {
            return Err(FilterError::Length {
                input: n,
                output: n,
                filter: len,
            });
        }
        let h = self.symmetric.half_length();
        let mut out = vec![f64::NAN; n];
        for (i, slot) in out.iter_mut().enumerate().take(n - h).skip(h) {
            *slot = self.symmetric.as_filter().value_at(input, i).unwrap_or(f64::NAN);
        }
        if let Some(left) = &self.left {
            for (k, slot) in out.iter_mut().enumerate().take(h) {
                if let Some(f) = left.filter(k) {
                    *slot = f.value_at(input, k).unwrap_or(f64::NAN);
                }
            }
        }
        if let Some(right) = &self.right {
            for k in 0..h {
                let i = n - 1 - k;
                if let Some(f) = right.filter(k) {
                    out[i] = f.value_at(input, i).unwrap_or(f64::NAN);
                }
            }
        }
        Ok(out)
    }
}

/// Centred moving average over `period` observations.
///
/// Lags with `|j| + 1/2 <= period / 2` get weight `1 / period`; the first
/// partially covered lag `±m` gets the remaining mass
/// `(period / 2 - (m - 1/2)) / period`. An even integer period gives the
/// classic `2 x period` average, an odd one the plain `period`-term average.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] unless `period` is finite and
/// at least 2.
pub fn centered_moving_average(period: f64) -> Result<SymmetricFilter, FilterError> {
    if !period.is_finite() || period < 2.0 {
        return Err(FilterError::InvalidParameter {
            reason: format!("moving-average period {period} must be finite and >= 2"),
        });
    }
    let half = period / 2.0;
    let m = (half - 0.5).floor() as usize + 1;
    let residual = (half - (m as f64 - 0.5)) / period;
    let mut weights = vec![1.0 / period; m];
    if residual > 1e-12 {
        weights.push(residual);
    }
    SymmetricFilter::from_half(&weights)
}

/// Cache key and recipe for a [`TrendFilter`].
///
/// A Henderson kernel with degree 2 or 3 uses the closed-form Henderson
/// weights; any other combination is derived by local-polynomial
/// regression.
#[derive(Clone, Copy, Debug)]
pub struct TrendFilterSpec {
    length: usize,
    kernel: Kernel,
    degree: usize,
    left: Option<EndPointMethod>,
    right: Option<EndPointMethod>,
    ic: f64,
}

impl TrendFilterSpec {
    /// Henderson filter of `length` terms with LC end filters on both sides
    /// and an I/C ratio of 3.5.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            kernel: Kernel::Henderson,
            degree: 3,
            left: Some(EndPointMethod::Lc),
            right: Some(EndPointMethod::Lc),
            ic: 3.5,
        }
    }

    /// Sets the kernel.
    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the local polynomial degree.
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Sets the end-point methods; `None` leaves that end unfiltered.
    pub fn with_end_points(
        mut self,
        left: Option<EndPointMethod>,
        right: Option<EndPointMethod>,
    ) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Sets the I/C ratio used by the revision-minimising end filters.
    pub fn with_ic(mut self, ic: f64) -> Self {
        self.ic = ic;
        self
    }

    /// Number of terms of the interior filter.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Kernel of the interior filter.
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Local polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// End-point method at the start of the series.
    pub fn left(&self) -> Option<EndPointMethod> {
        self.left
    }

    /// End-point method at the end of the series.
    pub fn right(&self) -> Option<EndPointMethod> {
        self.right
    }

    /// I/C ratio.
    pub fn ic(&self) -> f64 {
        self.ic
    }

    /// Derives the filter described by this spec.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`FilterError::InvalidLength`] | even length or length below 3 |
    /// | [`FilterError::InvalidParameter`] | non-positive I/C ratio, degree too high |
    /// | [`FilterError::SingularSystem`] | degenerate end-point system |
    pub fn build(&self) -> Result<TrendFilter, FilterError> {
        if self.length % 2 == 0 || self.length < 3 {
            return Err(FilterError::InvalidLength {
                length: self.length,
                min: 3,
            });
        }
        if !(self.ic.is_finite() && self.ic > 0.0) {
            return Err(FilterError::InvalidParameter {
                reason: format!("I/C ratio {} must be positive", self.ic),
            });
        }
        let symmetric = match (self.kernel, self.degree) {
            (Kernel::Henderson, 2 | 3) => henderson(self.length)?,
            (kernel, degree) => local_polynomial(self.length / 2, degree, kernel)?,
        };
        let ends = |method: EndPointMethod| {
            end_filters(&symmetric, &method.strategy(self.ic, self.degree, self.kernel))
        };
        let left = self.left.map(&ends).transpose()?;
        let right = self.right.map(&ends).transpose()?;

        let mut filter = TrendFilter::new(symmetric);
        if let Some(l) = left {
            filter = filter.with_left(l)?;
        }
        if let Some(r) = right {
            filter = filter.with_right(r)?;
        }
        Ok(filter)
    }
}

impl PartialEq for TrendFilterSpec {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.kernel == other.kernel
            && self.degree == other.degree
            && self.left == other.left
            && self.right == other.right
            && self.ic.to_bits() == other.ic.to_bits()
    }
}

impl Eq for TrendFilterSpec {}

impl Hash for TrendFilterSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        self.kernel.hash(state);
        self.degree.hash(state);
        self.left.hash(state);
        self.right.hash(state);
        self.ic.to_bits().hash(state);
    }
}
