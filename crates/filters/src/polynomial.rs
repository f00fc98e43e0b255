//! Polynomial helpers and a small dense solver for filter design.
//!
//! Filter design only ever needs systems of a handful of unknowns (the
//! local-polynomial degree plus one, or the width of an end-point window),
//! so a row-major `Vec<f64>` with partial-pivot elimination is enough.

use crate::error::FilterError;

/// Multiplies two polynomials given by their coefficient sequences.
///
/// Convolving the weights of two filters yields the weights of the
/// composite filter; the composite's lower bound is the sum of the
/// operands' lower bounds.
///
/// # Example
///
/// ```
/// use seasadj_filters::convolve;
///
/// assert_eq!(convolve(&[1.0, 1.0], &[1.0, 1.0]), vec![1.0, 2.0, 1.0]);
/// ```
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Adds two coefficient sequences aligned on their first element.
pub fn add_aligned(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len().max(b.len());
    (0..n)
        .map(|i| a.get(i).copied().unwrap_or(0.0) + b.get(i).copied().unwrap_or(0.0))
        .collect()
}

/// Square matrix stored row-major.
#[derive(Clone, Debug)]
pub(crate) struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub(crate) fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub(crate) fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.n + col] = val;
    }

    #[inline(always)]
    pub(crate) fn add_to(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.n + col] += val;
    }

    /// Solves `self * x = rhs` by Gaussian elimination with partial pivoting.
    pub(crate) fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, FilterError> {
        let n = self.n;
        debug_assert_eq!(rhs.len(), n);
        let mut a = self.data.clone();
        let mut b = rhs.to_vec();
        let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0);

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&i, &j| a[i * n + col].abs().total_cmp(&a[j * n + col].abs()))
                .unwrap_or(col);
            if a[pivot * n + col].abs() <= 1e-13 * scale {
                return Err(FilterError::SingularSystem { size: n });
            }
            if pivot != col {
                for k in 0..n {
                    a.swap(col * n + k, pivot * n + k);
                }
                b.swap(col, pivot);
            }
            let p = a[col * n + col];
            for row in (col + 1)..n {
                let f = a[row * n + col] / p;
                if f == 0.0 {
                    continue;
                }
                for k in col..n {
                    a[row * n + k] -= f * a[col * n + k];
                }
                b[row] -= f * b[col];
            }
        }

        let mut x = vec![0.0; n];
        for row in (0..n).rev() {
            let mut s = b[row];
            for k in (row + 1)..n {
                s -= a[row * n + k] * x[k];
            }
            x[row] = s / a[row * n + row];
        }
        Ok(x)
    }
}

/// Returns `j^k` for a signed lag.
#[inline]
pub(crate) fn lag_power(j: i32, k: usize) -> f64 {
    (j as f64).powi(k as i32)
}
