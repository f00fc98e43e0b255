//! Extreme value detection and correction for X11 seasonal adjustment.
//!
//! Observations of an irregular-like series whose deviation from the
//! neutral value exceeds `lower_sigma` standard deviations are down-weighted,
//! linearly down to weight 0 at `upper_sigma`:
//!
//! | Deviation | Weight |
//! |-----------|--------|
//! | `<= lower σ` | 1 |
//! | between | `(upper σ - |d|) / (upper σ - lower σ)` |
//! | `>= upper σ` | 0 |
//!
//! Sigmas are root mean squares about the neutral value over a window of
//! `nperiods` complete cycles around each year.
//!
//! # Quick start
//!
//! ```
//! use seasadj_extremes::ExtremeValuesCorrector;
//!
//! let mut si: Vec<f64> = (0..120).map(|t| if t % 2 == 0 { 1.01 } else { 0.99 }).collect();
//! si[65] = 1.5;
//! let ev = ExtremeValuesCorrector::new(12).analyse(&si).unwrap();
//! assert_eq!(ev.weights()[65], 0.0);
//! let corrected = ev.compute_corrections(&si).unwrap().apply(&si).unwrap();
//! assert!((corrected[65] - 0.99).abs() < 1e-9);
//! ```

pub mod corrector;
pub mod error;

pub use corrector::{Corrections, ExtremeValues, ExtremeValuesCorrector, MIN_SIGMA};
pub use error::ExtremesError;
