//! Closed-form Henderson trend filters.

use crate::error::FilterError;
use crate::symmetric::SymmetricFilter;

/// Computes the Henderson filter of odd `length` from the closed-form
/// expression
///
/// ```text
///            315 [(n-1)² - j²][n² - j²][(n+1)² - j²][3n² - 16 - 11j²]
/// w(j) = ---------------------------------------------------------------
///               8n (n² - 1)(4n² - 1)(4n² - 9)(4n² - 25)
/// ```
///
/// with `n = m + 2` and `m = length / 2`. Use
/// [`FilterCache::henderson`](crate::FilterCache::henderson) to share the
/// weights between runs.
///
/// # Errors
///
/// Returns [`FilterError::InvalidLength`] when `length` is even or below 3.
///
/// # Example
///
/// ```
/// use seasadj_filters::henderson;
///
/// let h13 = henderson(13).unwrap();
/// assert_eq!(h13.len(), 13);
/// assert!((h13.weight(0) - 0.24006).abs() < 1e-5);
/// ```
pub fn henderson(length: usize) -> Result<SymmetricFilter, FilterError> {
    if length % 2 == 0 || length < 3 {
        return Err(FilterError::InvalidLength { length, min: 3 });
    }
    let m = length / 2;
    let n = (m + 2) as f64;
    let n2 = n * n;
    let denom = 8.0 * n * (n2 - 1.0) * (4.0 * n2 - 1.0) * (4.0 * n2 - 9.0) * (4.0 * n2 - 25.0);
    let half: Vec<f64> = (0..=m)
        .map(|j| {
            let j2 = (j * j) as f64;
            let num = ((n - 1.0) * (n - 1.0) - j2)
                * (n2 - j2)
                * ((n + 1.0) * (n + 1.0) - j2)
                * (3.0 * n2 - 16.0 - 11.0 * j2);
            315.0 * num / denom
        })
        .collect();
    SymmetricFilter::from_half(&half)
}
