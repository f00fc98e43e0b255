//! Asymmetric end-point filters for symmetric trend filters.
//!
//! Near the end of a series a centred filter of half-length `h` lacks
//! future observations. For every `q = 0..h` observed future points an
//! asymmetric filter on lags `-h..=q` replaces it; near the start the
//! mirrored filters are used.
//!
//! | Method | Construction |
//! |--------|--------------|
//! | `LC` | Musgrave: keeps constants, minimises revisions under a linear trend |
//! | `QL` | keeps linear trends, minimises revisions under a quadratic trend |
//! | `CQ` | keeps quadratic trends, minimises revisions under a cubic trend |
//! | `CC` | keeps constants, redistributes the missing weight uniformly |
//! | `DAF` | re-fits the local polynomial on the truncated window |
//! | `CN` | truncates the symmetric weights and renormalises them |
//!
//! Every end filter sums to one.

use std::f64::consts::PI;

use crate::error::FilterError;
use crate::finite::FiniteFilter;
use crate::kernel::Kernel;
use crate::local_polynomial::direct_asymmetric;
use crate::polynomial::{Matrix, lag_power};
use crate::symmetric::SymmetricFilter;

/// Name-level selection of an end-point method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EndPointMethod {
    /// Linear-constant (Musgrave).
    #[default]
    Lc,
    /// Quadratic-linear.
    Ql,
    /// Cubic-quadratic.
    Cq,
    /// Constant-constant.
    Cc,
    /// Direct asymmetric local-polynomial fit.
    Daf,
    /// Cut and normalise.
    Cn,
}

impl EndPointMethod {
    /// Parses a method from a case-insensitive name (`"LC"`, `"QL"`, `"CQ"`,
    /// `"CC"`, `"DAF"`, `"CN"`).
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnsupportedName`] if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, FilterError> {
        match name.to_uppercase().as_str() {
            "LC" => Ok(Self::Lc),
            "QL" => Ok(Self::Ql),
            "CQ" => Ok(Self::Cq),
            "CC" => Ok(Self::Cc),
            "DAF" => Ok(Self::Daf),
            "CN" => Ok(Self::Cn),
            _ => Err(FilterError::UnsupportedName {
                kind: "end-point method",
                name: name.to_string(),
            }),
        }
    }

    /// Canonical name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lc => "LC",
            Self::Ql => "QL",
            Self::Cq => "CQ",
            Self::Cc => "CC",
            Self::Daf => "DAF",
            Self::Cn => "CN",
        }
    }

    /// Resolves the method into a strategy carrying its parameters.
    ///
    /// `ic` is the I/C ratio used by the revision-minimising methods, `degree`
    /// and `kernel` describe the local polynomial re-fitted by `DAF`.
    pub fn strategy(self, ic: f64, degree: usize, kernel: Kernel) -> EndPointStrategy {
        let ratio = trend_noise_ratio(ic);
        match self {
            Self::Lc => EndPointStrategy::Lc { ratio },
            Self::Ql => EndPointStrategy::Ql { ratio },
            Self::Cq => EndPointStrategy::Cq { ratio },
            Self::Cc => EndPointStrategy::Cc,
            Self::Daf => EndPointStrategy::Daf { degree, kernel },
            Self::Cn => EndPointStrategy::Cn,
        }
    }
}

/// Fully parameterised end-point strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EndPointStrategy {
    /// Musgrave filter with squared slope-to-noise ratio `ratio`.
    Lc {
        /// `β²/σ²`, see [`trend_noise_ratio`].
        ratio: f64,
    },
    /// Keeps linear trends; the quadratic term carries `ratio`.
    Ql {
        /// Squared trend-to-noise ratio of the quadratic term.
        ratio: f64,
    },
    /// Keeps quadratic trends; the cubic term carries `ratio`.
    Cq {
        /// Squared trend-to-noise ratio of the cubic term.
        ratio: f64,
    },
    /// Uniform redistribution of the missing weight.
    Cc,
    /// Local polynomial re-fit.
    Daf {
        /// Local polynomial degree.
        degree: usize,
        /// Kernel of the fit.
        kernel: Kernel,
    },
    /// Truncation and renormalisation.
    Cn,
}

/// Converts an I/C ratio into the Musgrave ratio `β²/σ² = 4 / (π R²)`.
pub fn trend_noise_ratio(ic: f64) -> f64 {
    4.0 / (PI * ic * ic)
}

/// I/C ratio used for the Musgrave end filters of a Henderson trend of
/// `length` terms on a series of the given `period`.
///
/// | Period | Length | R |
/// |--------|--------|---|
/// | ≤ 4 | ≤ 5 | 0.001 |
/// | ≤ 4 | > 5 | 4.5 |
/// | > 4 | ≤ 9 | 1.0 |
/// | > 4 | ≤ 13 | 3.5 |
/// | > 4 | > 13 | 4.5 |
pub fn ic_ratio(length: usize, period: f64) -> f64 {
    if period <= 4.0 {
        if length <= 5 { 0.001 } else { 4.5 }
    } else if length <= 9 {
        1.0
    } else if length <= 13 {
        3.5
    } else {
        4.5
    }
}

/// Which end of the series a set of end filters serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Start of the series: filters lack past observations.
    Left,
    /// End of the series: filters lack future observations.
    Right,
}

/// End filters for one side of a symmetric filter of half-length `h`.
///
/// `filter(k)` serves the observation `k` positions away from the
/// boundary, i.e. the one with only `k` neighbours on the short side.
#[derive(Clone, Debug, PartialEq)]
pub struct EndFilters {
    side: Side,
    filters: Vec<FiniteFilter>,
}

impl EndFilters {
    /// Wraps right-side filters ordered by available future points.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`] if filter `k` does not span
    /// lags `-h..=k` with `h = filters.len()`.
    pub fn right(filters: Vec<FiniteFilter>) -> Result<Self, FilterError> {
        let h = filters.len() as i32;
        for (k, f) in filters.iter().enumerate() {
            if f.lower_bound() < -h || f.upper_bound() != k as i32 {
                return Err(FilterError::InvalidParameter {
                    reason: format!(
                        "end filter {k} spans [{}, {}], expected upper bound {k} within horizon {h}",
                        f.lower_bound(),
                        f.upper_bound()
                    ),
                });
            }
        }
        Ok(Self {
            side: Side::Right,
            filters,
        })
    }

    /// The same filters serving the other end of the series.
    pub fn mirrored(&self) -> Self {
        Self {
            side: match self.side {
                Side::Left => Side::Right,
                Side::Right => Side::Left,
            },
            filters: self.filters.iter().map(FiniteFilter::mirror).collect(),
        }
    }

    /// Side served by these filters.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of end filters (the half-length of the symmetric filter).
    pub fn horizon(&self) -> usize {
        self.filters.len()
    }

    /// Filter for the observation `k` positions from the boundary.
    pub fn filter(&self, k: usize) -> Option<&FiniteFilter> {
        self.filters.get(k)
    }

    /// All filters, nearest to the boundary first.
    pub fn filters(&self) -> &[FiniteFilter] {
        &self.filters
    }
}

/// Builds the right-side end filters of `symmetric` under `strategy`.
///
/// # Errors
///
/// Propagates [`FilterError`] from the underlying construction (singular
/// systems, zero-sum truncations, degenerate local-polynomial fits).
pub fn end_filters(
    symmetric: &SymmetricFilter,
    strategy: &EndPointStrategy,
) -> Result<EndFilters, FilterError> {
    let h = symmetric.half_length();
    let filters = (0..h)
        .map(|q| end_filter(symmetric, q, strategy))
        .collect::<Result<Vec<_>, _>>()?;
    EndFilters::right(filters)
}

/// Single right-side end filter with `q` future observations.
pub fn end_filter(
    symmetric: &SymmetricFilter,
    q: usize,
    strategy: &EndPointStrategy,
) -> Result<FiniteFilter, FilterError> {
    let h = symmetric.half_length();
    if q >= h {
        return Err(FilterError::InvalidParameter {
            reason: format!("{q} future points leave nothing to truncate at half-length {h}"),
        });
    }
    match *strategy {
        EndPointStrategy::Lc { ratio } => musgrave(symmetric, q, ratio),
        EndPointStrategy::Ql { ratio } => mmsre(symmetric, q, 1, &[2], ratio),
        EndPointStrategy::Cq { ratio } => mmsre(symmetric, q, 2, &[3], ratio),
        EndPointStrategy::Cc => mmsre(symmetric, q, 0, &[], 0.0),
        EndPointStrategy::Daf { degree, kernel } => direct_asymmetric(h, q, degree, kernel),
        EndPointStrategy::Cn => cut_and_normalize(symmetric, q),
    }
}

/// Musgrave end filter in closed form.
///
/// With `N = h + q + 1` observed points, `c = (N + 1) / 2` and
/// `D = ratio`, the weight of the `i`-th observed point (1-based) is
///
/// ```text
/// u_i = w_i + (1/N) Σ_miss w_r
///           + (i - c) D / (1 + N(N-1)(N+1) D / 12) · Σ_miss (r - c) w_r
/// ```
pub fn musgrave(
    symmetric: &SymmetricFilter,
    q: usize,
    ratio: f64,
) -> Result<FiniteFilter, FilterError> {
    let h = symmetric.half_length() as i32;
    let q = q as i32;
    let n = (h + q + 1) as f64;
    let c = (n + 1.0) / 2.0;
    let (mut missing, mut missing_moment) = (0.0, 0.0);
    for j in (q + 1)..=h {
        let w = symmetric.weight(j);
        let r = (j + h + 1) as f64;
        missing += w;
        missing_moment += (r - c) * w;
    }
    let slope = ratio / (1.0 + n * (n - 1.0) * (n + 1.0) * ratio / 12.0);
    let weights = (-h..=q)
        .map(|j| {
            let i = (j + h + 1) as f64;
            symmetric.weight(j) + missing / n + (i - c) * slope * missing_moment
        })
        .collect();
    FiniteFilter::new(-h, weights)
}

/// Truncates `symmetric` to lags `-h..=q` and rescales to unit sum.
pub fn cut_and_normalize(symmetric: &SymmetricFilter, q: usize) -> Result<FiniteFilter, FilterError> {
    let h = symmetric.half_length() as i32;
    let truncated =
        FiniteFilter::from_fn(-h, q as i32, |j: i32| symmetric.weight(j))?;
    truncated.normalized()
}

/// Minimum mean squared revision filter.
///
/// Solves `min (v - w_a)'(v - w_a) + (Z_a'v - Z'w)' D (Z_a'v - Z'w)`
/// subject to `U_a'v = U'w`, where `U` holds the powers `0..=preserved` of
/// the lags (the polynomials the filter must reproduce) and `Z` the powers in
/// `bias` (the trend terms whose revision is penalised with `D = ratio I`).
/// `preserved` is capped at `h + q`.
fn mmsre(
    symmetric: &SymmetricFilter,
    q: usize,
    preserved: usize,
    bias: &[usize],
    ratio: f64,
) -> Result<FiniteFilter, FilterError> {
    let h = symmetric.half_length() as i32;
    let q = q as i32;
    let lags: Vec<i32> = (-h..=q).collect();
    let n = lags.len();
    // Short windows keep the highest degree their points identify.
    let nu = (preserved + 1).min(n);
    let moment = |k: usize| -> f64 {
        (-h..=h)
            .map(|j| symmetric.weight(j) * lag_power(j, k))
            .sum()
    };

    // A = I + Z_a D Z_a', b = w_a + Z_a D Z'w
    let mut a = Matrix::identity(n);
    let mut b: Vec<f64> = lags.iter().map(|&j| symmetric.weight(j)).collect();
    for &k in bias {
        let target = moment(k);
        for (r, &jr) in lags.iter().enumerate() {
            let zr = lag_power(jr, k);
            b[r] += ratio * zr * target;
            for (c, &jc) in lags.iter().enumerate() {
                a.add_to(r, c, ratio * zr * lag_power(jc, k));
            }
        }
    }

    let a_inv_b = a.solve(&b)?;
    let a_inv_u = (0..nu)
        .map(|k| {
            let col: Vec<f64> = lags.iter().map(|&j| lag_power(j, k)).collect();
            a.solve(&col)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // (U_a' A^-1 U_a) λ = U'w - U_a' A^-1 b
    let mut g = Matrix::zeros(nu);
    let mut rhs = vec![0.0; nu];
    for r in 0..nu {
        let ur: Vec<f64> = lags.iter().map(|&j| lag_power(j, r)).collect();
        for (c, col) in a_inv_u.iter().enumerate() {
            g.set(r, c, dot(&ur, col));
        }
        rhs[r] = moment(r) - dot(&ur, &a_inv_b);
    }
    let lambda = g.solve(&rhs)?;

    let weights = (0..n)
        .map(|i| {
            a_inv_b[i]
                + lambda
                    .iter()
                    .zip(&a_inv_u)
                    .map(|(l, col)| l * col[i])
                    .sum::<f64>()
        })
        .collect();
    FiniteFilter::new(-h, weights)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::henderson::henderson;
    use approx::assert_abs_diff_eq;

    #[test]
    fn method_names() {
        for m in [
            EndPointMethod::Lc,
            EndPointMethod::Ql,
            EndPointMethod::Cq,
            EndPointMethod::Cc,
            EndPointMethod::Daf,
            EndPointMethod::Cn,
        ] {
            assert_eq!(EndPointMethod::from_name(m.name()).unwrap(), m);
        }
        assert_eq!(EndPointMethod::from_name("daf").unwrap(), EndPointMethod::Daf);
        assert!(matches!(
            EndPointMethod::from_name("XX"),
            Err(FilterError::UnsupportedName { .. })
        ));
    }

    #[test]
    fn ic_ratio_table() {
        assert_eq!(ic_ratio(9, 12.0), 1.0);
        assert_eq!(ic_ratio(13, 12.0), 3.5);
        assert_eq!(ic_ratio(23, 12.0), 4.5);
        assert_eq!(ic_ratio(5, 4.0), 0.001);
        assert_eq!(ic_ratio(7, 4.0), 4.5);
    }

    #[test]
    fn musgrave_h13_last_point() {
        // Published X-11 Musgrave weights of the 13-term Henderson, R = 3.5,
        // for the last observation (lags -6..=0).
        let reference = [-0.09186, -0.05811, 0.01202, 0.11977, 0.24390, 0.35315, 0.42113];
        let f = musgrave(&henderson(13).unwrap(), 0, trend_noise_ratio(3.5)).unwrap();
        for (w, r) in f.weights().iter().zip(&reference) {
            assert_abs_diff_eq!(*w, *r, epsilon = 1e-4);
        }
    }

    #[test]
    fn lc_matches_closed_form_musgrave() {
        let h13 = henderson(13).unwrap();
        let ratio = trend_noise_ratio(3.5);
        for q in 0..6 {
            let closed = musgrave(&h13, q, ratio).unwrap();
            let general = mmsre(&h13, q, 0, &[1], ratio).unwrap();
            for (a, b) in closed.weights().iter().zip(general.weights()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn cc_redistributes_uniformly() {
        let h9 = henderson(9).unwrap();
        let f = end_filter(&h9, 1, &EndPointStrategy::Cc).unwrap();
        let missing: f64 = (2..=4).map(|j| h9.weight(j)).sum();
        for j in -4..=1 {
            assert_abs_diff_eq!(f.weight(j), h9.weight(j) + missing / 6.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn every_strategy_sums_to_one() {
        let h13 = henderson(13).unwrap();
        for method in [
            EndPointMethod::Lc,
            EndPointMethod::Ql,
            EndPointMethod::Cq,
            EndPointMethod::Cc,
            EndPointMethod::Daf,
            EndPointMethod::Cn,
        ] {
            let strategy = method.strategy(3.5, 3, Kernel::Henderson);
            let ends = end_filters(&h13, &strategy).unwrap();
            assert_eq!(ends.horizon(), 6);
            for (q, f) in ends.filters().iter().enumerate() {
                assert_eq!(f.upper_bound(), q as i32);
                assert_abs_diff_eq!(f.sum(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn short_henderson_filters_have_every_end_filter() {
        for length in [3, 5] {
            let hl = henderson(length).unwrap();
            for method in [
                EndPointMethod::Lc,
                EndPointMethod::Ql,
                EndPointMethod::Cq,
                EndPointMethod::Cc,
                EndPointMethod::Daf,
                EndPointMethod::Cn,
            ] {
                let strategy = method.strategy(ic_ratio(length, 4.0), 3, Kernel::Henderson);
                let ends = end_filters(&hl, &strategy).unwrap();
                assert_eq!(ends.horizon(), length / 2);
                for f in ends.filters() {
                    assert_abs_diff_eq!(f.sum(), 1.0, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn cq_on_two_points_keeps_lines() {
        let h3 = henderson(3).unwrap();
        let f = end_filter(&h3, 0, &EndPointStrategy::Cq { ratio: 0.5 }).unwrap();
        assert_eq!(f.weights().len(), 2);
        let first: f64 = (-1..=0).map(|j| j as f64 * f.weight(j)).sum();
        assert_abs_diff_eq!(f.sum(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(first, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn ql_and_cq_preserve_their_polynomials() {
        let h13 = henderson(13).unwrap();
        let ql = end_filter(&h13, 2, &EndPointStrategy::Ql { ratio: 0.1 }).unwrap();
        let first: f64 = (-6..=2).map(|j| j as f64 * ql.weight(j)).sum();
        assert_abs_diff_eq!(first, 0.0, epsilon = 1e-9);

        let cq = end_filter(&h13, 2, &EndPointStrategy::Cq { ratio: 0.1 }).unwrap();
        let second: f64 = (-6..=2).map(|j| (j * j) as f64 * cq.weight(j)).sum();
        let target: f64 = (-6..=6).map(|j| (j * j) as f64 * h13.weight(j)).sum();
        assert_abs_diff_eq!(second, target, epsilon = 1e-8);
    }

    #[test]
    fn cut_and_normalize_rescales() {
        let h5 = henderson(5).unwrap();
        let f = cut_and_normalize(&h5, 1).unwrap();
        let s: f64 = (-2..=1).map(|j| h5.weight(j)).sum();
        assert_abs_diff_eq!(f.weight(0), h5.weight(0) / s, epsilon = 1e-12);
    }

    #[test]
    fn mirrored_end_filters_serve_left_side() {
        let h13 = henderson(13).unwrap();
        let right = end_filters(&h13, &EndPointStrategy::Cn).unwrap();
        let left = right.mirrored();
        assert_eq!(left.side(), Side::Left);
        let f0 = left.filter(0).unwrap();
        assert_eq!(f0.lower_bound(), 0);
        assert_eq!(f0.upper_bound(), 6);
        assert_eq!(left.mirrored(), right);
    }

    #[test]
    fn end_filter_rejects_full_window() {
        let h5 = henderson(5).unwrap();
        assert!(end_filter(&h5, 2, &EndPointStrategy::Cn).is_err());
    }
}
