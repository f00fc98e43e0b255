//! Kernel-weighted local-polynomial trend filters.
//!
//! The filter weights are the coefficients of the weighted least-squares
//! estimate of the local level at lag 0: with `X[j] = (1, j, .., j^d)` and
//! kernel weights `K(j)`, `w(j) = K(j) X[j]' (X'KX)^{-1} e1`.

use crate::error::FilterError;
use crate::finite::FiniteFilter;
use crate::kernel::Kernel;
use crate::polynomial::{Matrix, lag_power};
use crate::symmetric::SymmetricFilter;

/// Symmetric local-polynomial filter with half-window `h` and degree `degree`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`FilterError::InvalidParameter`] | `h == 0` or `degree > 2h` |
/// | [`FilterError::SingularSystem`] | degenerate kernel weights |
pub fn local_polynomial(
    h: usize,
    degree: usize,
    kernel: Kernel,
) -> Result<SymmetricFilter, FilterError> {
    if h == 0 {
        return Err(FilterError::InvalidParameter {
            reason: "local polynomial half-window must be at least 1".into(),
        });
    }
    let weights = fit_level_weights(-(h as i32), h as i32, degree, |j| kernel.weight(j, h))?;
    // The estimate is symmetric in exact arithmetic; average the two halves so
    // the symmetry invariant holds bit for bit.
    let half: Vec<f64> = (0..=h)
        .map(|k| 0.5 * (weights[h + k] + weights[h - k]))
        .collect();
    SymmetricFilter::from_half(&half)
}

/// Direct asymmetric filter: the local-polynomial fit restricted to the
/// lags `-h..=q` that are actually observed, evaluated at lag 0.
///
/// The fitted degree is capped at `h + q`, the highest degree the
/// `h + q + 1` observed points identify.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`FilterError::InvalidParameter`] | `q > h` |
/// | [`FilterError::SingularSystem`] | degenerate kernel weights |
pub fn direct_asymmetric(
    h: usize,
    q: usize,
    degree: usize,
    kernel: Kernel,
) -> Result<FiniteFilter, FilterError> {
    if q > h {
        return Err(FilterError::InvalidParameter {
            reason: format!("{q} future points exceed the half-window {h}"),
        });
    }
    let degree = degree.min(h + q);
    let weights = fit_level_weights(-(h as i32), q as i32, degree, |j| kernel.weight(j, h))?;
    FiniteFilter::new(-(h as i32), weights)
}

fn fit_level_weights(
    lower: i32,
    upper: i32,
    degree: usize,
    kernel: impl Fn(i32) -> f64,
) -> Result<Vec<f64>, FilterError> {
    let npoints = (upper - lower + 1) as usize;
    if degree >= npoints {
        return Err(FilterError::InvalidParameter {
            reason: format!("degree {degree} needs more than {npoints} points"),
        });
    }
    let p = degree + 1;
    let mut xkx = Matrix::zeros(p);
    for j in lower..=upper {
        let k = kernel(j);
        for r in 0..p {
            for c in 0..p {
                xkx.add_to(r, c, k * lag_power(j, r + c));
            }
        }
    }
    let mut e1 = vec![0.0; p];
    e1[0] = 1.0;
    let coef = xkx.solve(&e1)?;
    Ok((lower..=upper)
        .map(|j| {
            let xb: f64 = coef
                .iter()
                .enumerate()
                .map(|(r, c)| c * lag_power(j, r))
                .sum();
            kernel(j) * xb
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::henderson::henderson;
    use approx::assert_abs_diff_eq;

    #[test]
    fn henderson_kernel_reproduces_closed_form() {
        for h in [2usize, 4, 6, 11] {
            let lp = local_polynomial(h, 3, Kernel::Henderson).unwrap();
            let closed = henderson(2 * h + 1).unwrap();
            for (a, b) in lp.weights().iter().zip(closed.weights()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn uniform_degree_zero_is_simple_average() {
        let f = local_polynomial(2, 0, Kernel::Uniform).unwrap();
        for w in f.weights() {
            assert_abs_diff_eq!(*w, 0.2, epsilon = 1e-12);
        }
    }

    #[test]
    fn degree_two_and_three_coincide_for_symmetric_windows() {
        let a = local_polynomial(6, 2, Kernel::Biweight).unwrap();
        let b = local_polynomial(6, 3, Kernel::Biweight).unwrap();
        for (x, y) in a.weights().iter().zip(b.weights()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn local_polynomial_reproduces_cubics() {
        let f = local_polynomial(6, 3, Kernel::Tricube).unwrap();
        let x: Vec<f64> = (0..13).map(|t| {
            let t = t as f64 - 6.0;
            1.0 + 0.5 * t - 0.1 * t * t + 0.01 * t * t * t
        }).collect();
        let v = f.as_filter().value_at(&x, 6).unwrap();
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn direct_asymmetric_preserves_polynomials() {
        for kernel in [Kernel::Henderson, Kernel::Uniform, Kernel::Gaussian] {
            for q in 0..6 {
                let f = direct_asymmetric(6, q, 2, kernel).unwrap();
                assert_eq!(f.lower_bound(), -6);
                assert_eq!(f.upper_bound(), q as i32);
                assert_abs_diff_eq!(f.sum(), 1.0, epsilon = 1e-9);
                let first_moment: f64 = (-6..=q as i32).map(|j| j as f64 * f.weight(j)).sum();
                assert_abs_diff_eq!(first_moment, 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn direct_asymmetric_full_window_is_symmetric_filter() {
        let sym = local_polynomial(4, 2, Kernel::Parabolic).unwrap();
        let daf = direct_asymmetric(4, 4, 2, Kernel::Parabolic).unwrap();
        for (a, b) in sym.weights().iter().zip(daf.weights()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn direct_asymmetric_caps_degree_on_short_windows() {
        // h = 2, q = 0: three points cannot identify a cubic, the fit
        // falls back to a quadratic through all three.
        let f = direct_asymmetric(2, 0, 3, Kernel::Henderson).unwrap();
        assert_abs_diff_eq!(f.sum(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.weight(0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.weight(-1), 0.0, epsilon = 1e-12);

        let g = direct_asymmetric(1, 0, 3, Kernel::Uniform).unwrap();
        assert_eq!(g.weights().len(), 2);
        assert_abs_diff_eq!(g.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_degenerate_requests() {
        assert!(local_polynomial(0, 2, Kernel::Uniform).is_err());
        assert!(direct_asymmetric(3, 4, 2, Kernel::Uniform).is_err());
        assert!(matches!(
            local_polynomial(1, 3, Kernel::Uniform),
            Err(FilterError::InvalidParameter { .. })
        ));
    }
}
