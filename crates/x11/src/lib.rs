//! X11 decomposition of a periodic series into trend, seasonal and
//! irregular components.
//!
//! The decomposition runs two passes of the same table sequence. The B step
//! works on the original series and estimates the irregular extremes; the C
//! step repeats the sequence on the series with those extremes replaced.
//!
//! | Output | Table | Accessor |
//! |--------|-------|----------|
//! | Trend | `c7` | [`X11Result::trend`] |
//! | Seasonal factors | `c10` | [`X11Result::seasonal`] |
//! | Seasonally adjusted | `c11` | [`X11Result::seasonally_adjusted`] |
//! | Irregular | `c13` | [`X11Result::irregular`] |
//! | Extreme value weights | `c17` | [`X11Result::weights`] |
//! | Correction factors | `c20` | [`X11Result::corrections`] |
//!
//! # Quick start
//!
//! ```
//! use seasadj_stats::DecompositionMode;
//! use seasadj_x11::{X11Config, decompose};
//!
//! let pattern = [1.1, 0.9, 1.05, 0.95];
//! let series: Vec<f64> = (0..48).map(|t| (50.0 + 0.5 * t as f64) * pattern[t % 4]).collect();
//! let config = X11Config::new(DecompositionMode::Multiplicative, 4.0);
//! let result = decompose(&series, &config).unwrap();
//!
//! for t in 0..series.len() {
//!     let rebuilt = result.trend()[t] * result.seasonal()[t] * result.irregular()[t];
//!     assert!((rebuilt - series[t]).abs() < 1e-9);
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! X11Decomposer::decompose()
//!   ├─ StepContext::run(B, series)            (step.rs)
//!   │    ├─ SeasonalFilter + SeasonalNormalizer (normalize.rs)
//!   │    ├─ FilterCache::trend_filter()
//!   │    ├─ select_seasonal_filter()           (msr.rs)
//!   │    └─ ExtremeValuesCorrector
//!   └─ StepContext::run(C, series / b20)
//! ```

pub mod config;
pub mod decompose;
pub mod error;
pub mod msr;
pub mod normalize;
pub mod result;
pub mod table;

pub(crate) mod step;

pub use config::{TrendLength, X11Config};
pub use decompose::{X11Decomposer, decompose};
pub use error::X11Error;
pub use msr::{MsrSelection, filter_for_ratio, moving_seasonality_ratio, select_seasonal_filter};
pub use normalize::{CenteredNormalizer, SeasonalNormalizer};
pub use result::{StepTables, X11Result};
pub use table::{Step, Table, TableKind};
