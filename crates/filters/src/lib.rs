//! Linear filters for X11-style seasonal adjustment.
//!
//! This crate provides the finite-filter algebra and the factories for the
//! trend and seasonal filters used by the decomposition pipeline:
//!
//! | Family | Entry point | Notes |
//! |--------|-------------|-------|
//! | Finite filters | [`FiniteFilter`] | contracting / extended / one-sided application, arithmetic |
//! | Symmetric filters | [`SymmetricFilter`] | validated odd-length centred filters |
//! | Henderson | [`henderson`] | closed form, cached by [`FilterCache`] |
//! | Local polynomial | [`local_polynomial`] | eight named [`Kernel`]s |
//! | End points | [`end_filters`] | LC (Musgrave), QL, CQ, CC, DAF, CN |
//! | Seasonal | [`SeasonalFilterOption`] | S3x1 … S3x15, Stable |
//!
//! # Quick start
//!
//! ```
//! use seasadj_filters::{FilterCache, TrendFilterSpec};
//!
//! let cache = FilterCache::new();
//! let trend = cache.trend_filter(&TrendFilterSpec::new(13)).unwrap();
//! let series: Vec<f64> = (0..30).map(|t| 100.0 + t as f64).collect();
//! let smoothed = trend.apply(&series).unwrap();
//! assert_eq!(smoothed.len(), 30);
//! assert!(smoothed.iter().all(|v| v.is_finite()));
//! ```
//!
//! # Architecture
//!
//! ```text
//! FilterCache::trend_filter()
//!   └─ TrendFilterSpec::build()
//!        ├─ henderson() | local_polynomial()   (henderson.rs, local_polynomial.rs)
//!        └─ end_filters()                      (endpoints.rs)
//!             └─ Matrix::solve()               (polynomial.rs)
//! ```

pub mod cache;
pub mod endpoints;
pub mod error;
pub mod finite;
pub mod henderson;
pub mod kernel;
pub mod local_polynomial;
pub mod seasonal;
pub mod symmetric;
pub mod trend;

pub(crate) mod polynomial;

pub use cache::FilterCache;
pub use endpoints::{
    EndFilters, EndPointMethod, EndPointStrategy, Side, cut_and_normalize, end_filter,
    end_filters, ic_ratio, musgrave, trend_noise_ratio,
};
pub use error::FilterError;
pub use finite::{Causality, FiniteFilter, SMOOTHING_EPSILON, WeightFunction};
pub use henderson::henderson;
pub use kernel::Kernel;
pub use local_polynomial::{direct_asymmetric, local_polynomial};
pub use polynomial::{add_aligned, convolve};
pub use seasonal::{SeasonalFilter, SeasonalFilterOption, SeasonalMovingAverage};
pub use symmetric::SymmetricFilter;
pub use trend::{TrendFilter, TrendFilterSpec, centered_moving_average};
