//! Entry points of the decomposition.

use std::sync::Arc;

use seasadj_filters::{FilterCache, centered_moving_average};
use tracing::{debug, info};

use crate::config::X11Config;
use crate::error::X11Error;
use crate::normalize::{CenteredNormalizer, SeasonalNormalizer};
use crate::result::X11Result;
use crate::step::{StepContext, min_length};
use crate::table::{Step, Table};

/// Reusable decomposer holding a validated configuration, a filter cache
/// and a seasonal normaliser.
///
/// The cache may be shared between decomposers running on different
/// threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use seasadj_filters::FilterCache;
/// use seasadj_x11::{X11Config, X11Decomposer};
///
/// let cache = Arc::new(FilterCache::new());
/// let decomposer = X11Decomposer::new(X11Config::default())
///     .unwrap()
///     .with_cache(Arc::clone(&cache));
///
/// let series: Vec<f64> = (0..72)
///     .map(|t| (100.0 + t as f64) * (1.0 + 0.1 * ((t % 12) as f64 - 5.5) / 5.5))
///     .collect();
/// let result = decomposer.decompose(&series).unwrap();
/// assert_eq!(result.trend().len(), 72);
/// assert!(cache.trend_len() > 0);
/// ```
#[derive(Clone)]
pub struct X11Decomposer {
    config: X11Config,
    cache: Arc<FilterCache>,
    normalizer: Arc<dyn SeasonalNormalizer>,
}

impl X11Decomposer {
    /// Creates a decomposer with a private cache and the centred normaliser.
    ///
    /// # Errors
    ///
    /// Returns [`X11Error::InvalidConfiguration`] if `config` does not
    /// validate.
    pub fn new(config: X11Config) -> Result<Self, X11Error> {
        config.validate()?;
        Ok(Self {
            config,
            cache: Arc::new(FilterCache::new()),
            normalizer: Arc::new(CenteredNormalizer),
        })
    }

    /// Uses a shared filter cache.
    pub fn with_cache(mut self, cache: Arc<FilterCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the seasonal normaliser.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn SeasonalNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &X11Config {
        &self.config
    }

    /// Returns the filter cache.
    pub fn cache(&self) -> &Arc<FilterCache> {
        &self.cache
    }

    /// Decomposes `series` into trend, seasonal and irregular components.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`X11Error::NonFiniteData`] | NaN or infinity in `series` |
    /// | [`X11Error::SeriesTooShort`] | fewer observations than the filters need |
    /// | [`X11Error::NegativeTrend`] | non-positive trend in multiplicative mode |
    /// | [`X11Error::Filter`] | a filter cannot be built or applied |
    /// | [`X11Error::Extremes`] | extreme value analysis fails |
    #[tracing::instrument(
        skip(self, series),
        fields(n = series.len(), period = self.config.period(), mode = ?self.config.mode())
    )]
    pub fn decompose(&self, series: &[f64]) -> Result<X11Result, X11Error> {
        if let Some(index) = series.iter().position(|v| !v.is_finite()) {
            return Err(X11Error::NonFiniteData { index });
        }
        let moving_average =
            centered_moving_average(self.config.period()).map_err(|source| X11Error::Filter {
                stage: Table::B2.name(),
                source,
            })?;
        let min = min_length(&self.config, &moving_average);
        if series.len() < min {
            return Err(X11Error::SeriesTooShort {
                len: series.len(),
                min,
            });
        }

        let context = StepContext {
            config: &self.config,
            cache: &self.cache,
            normalizer: self.normalizer.as_ref(),
            moving_average,
        };
        let mode = self.config.mode();

        // --- Step 1: B step on the original series ---
        let b = context.run(Step::B, series, series)?;

        // --- Step 2: C step on the extreme-corrected series ---
        let corrected = mode.remove(series, &b.correction_factors);
        let c = context.run(Step::C, &corrected, series)?;

        debug!(
            cached_trend_filters = self.cache.trend_len(),
            "decomposition cache state"
        );
        info!(
            trend_length = c.trend_length,
            seasonal_filter = c.seasonal_filter.name(),
            "decomposition complete"
        );
        Ok(X11Result { mode, b, c })
    }
}

/// Decomposes `series` with a one-off decomposer.
///
/// # Errors
///
/// See [`X11Decomposer::decompose`]; also returns
/// [`X11Error::InvalidConfiguration`] if `config` does not validate.
pub fn decompose(series: &[f64], config: &X11Config) -> Result<X11Result, X11Error> {
    X11Decomposer::new(config.clone())?.decompose(series)
}
