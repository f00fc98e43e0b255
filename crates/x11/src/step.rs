//! One B or C step of the decomposition.
//!
//! ```text
//! input (1)
//!   ├─ centred MA ─────────────── preliminary trend (2)
//!   ├─ remove trend ───────────── SI (3)
//!   ├─ initial seasonal + EV ──── corrected SI (4)      B step only
//!   ├─ initial seasonal ───────── preliminary seasonal (5)
//!   ├─ remove seasonal ────────── preliminary adjusted (6)
//!   ├─ trend filter ───────────── trend (7)
//!   ├─ remove trend ───────────── SI (8)
//!   ├─ final seasonal + EV ────── corrected SI (9)
//!   ├─ final seasonal ─────────── seasonal (10)
//!   ├─ original / seasonal ────── seasonally adjusted (11)
//!   ├─ remove trend ───────────── irregular (13)
//!   └─ EV on irregular ────────── weights (17), factors (20)
//! ```

use seasadj_extremes::ExtremeValuesCorrector;
use seasadj_filters::{
    FilterCache, FilterError, SeasonalFilter, SeasonalFilterOption, SymmetricFilter,
    TrendFilterSpec, ic_ratio,
};
use seasadj_stats::{DecompositionMode, mean_abs_change};
use tracing::debug;

use crate::config::{TrendLength, X11Config};
use crate::error::X11Error;
use crate::msr::select_seasonal_filter;
use crate::normalize::SeasonalNormalizer;
use crate::result::StepTables;
use crate::table::{Step, Table, TableKind};

/// Shared state of the two steps of one decomposition.
pub(crate) struct StepContext<'a> {
    pub(crate) config: &'a X11Config,
    pub(crate) cache: &'a FilterCache,
    pub(crate) normalizer: &'a dyn SeasonalNormalizer,
    pub(crate) moving_average: SymmetricFilter,
}

impl StepContext<'_> {
    fn mode(&self) -> DecompositionMode {
        self.config.mode()
    }

    fn stride(&self) -> usize {
        self.config.seasonal_stride()
    }

    fn corrector(&self) -> ExtremeValuesCorrector {
        ExtremeValuesCorrector::new(self.stride())
            .with_mode(self.mode())
            .with_sigma_limits(self.config.lower_sigma(), self.config.upper_sigma())
    }

    /// Runs one step on `input`. `original` is the series the seasonally
    /// adjusted table is computed from.
    pub(crate) fn run(
        &self,
        step: Step,
        input: &[f64],
        original: &[f64],
    ) -> Result<StepTables, X11Error> {
        let mode = self.mode();
        let stride = self.stride();
        let n = input.len();
        let table = |kind| Table::new(step, kind);

        // --- Table 2: preliminary trend ---
        let h = self.moving_average.half_length();
        let inner = self
            .moving_average
            .as_filter()
            .filter(input)
            .map_err(at(table(TableKind::PreliminaryTrend)))?;
        let mut preliminary_trend = vec![f64::NAN; n];
        preliminary_trend[h..h + inner.len()].copy_from_slice(&inner);
        check_trend(mode, table(TableKind::PreliminaryTrend), &preliminary_trend)?;

        // --- Table 3: SI ratios ---
        let seasonal_irregular = mode.remove(input, &preliminary_trend);

        // --- Table 4: first extreme value correction ---
        let stage = table(TableKind::CorrectedSeasonalIrregular);
        let initial = concrete(initial_option(self.config.initial_seasonal()), stage)?;
        let corrected_seasonal_irregular = match step {
            Step::B => {
                let seasonal = self.seasonal(&initial, &seasonal_irregular, stage)?;
                self.correct(&seasonal_irregular, &seasonal)?
            }
            Step::C => seasonal_irregular.clone(),
        };

        // --- Table 5: preliminary seasonal ---
        let stage = table(TableKind::PreliminarySeasonal);
        let mut preliminary_seasonal =
            self.seasonal(&initial, &corrected_seasonal_irregular, stage)?;
        extend_seasonal(&mut preliminary_seasonal, stride);

        // --- Table 6: preliminary adjusted ---
        let preliminary_adjusted = mode.remove(input, &preliminary_seasonal);

        // --- Table 7: trend ---
        let stage = table(TableKind::Trend);
        let trend_length = match self.config.trend_length() {
            TrendLength::Fixed(len) => len,
            TrendLength::Auto => self.auto_trend_length(&preliminary_adjusted, stage)?,
        };
        let spec = TrendFilterSpec::new(trend_length)
            .with_kernel(self.config.kernel())
            .with_degree(self.config.degree())
            .with_end_points(
                self.config.left_end_points(),
                self.config.right_end_points(),
            )
            .with_ic(ic_ratio(trend_length, self.config.period()));
        let trend = self
            .cache
            .trend_filter(&spec)
            .and_then(|filter| filter.apply(&preliminary_adjusted))
            .map_err(at(stage))?;
        check_trend(mode, stage, &trend)?;

        // --- Table 8: final SI ratios ---
        let final_seasonal_irregular = mode.remove(input, &trend);

        // --- Table 9: second extreme value correction ---
        let stage = table(TableKind::FinalCorrectedSeasonalIrregular);
        let (option, msr) = match self.config.final_seasonal() {
            SeasonalFilterOption::X11Default => (SeasonalFilterOption::S3x5, None),
            SeasonalFilterOption::Msr => {
                let selection = select_seasonal_filter(&final_seasonal_irregular, mode, stride)?;
                (selection.option, selection.ratio)
            }
            other => (other, None),
        };
        let final_filter = concrete(option, stage)?;
        let seasonal = self.seasonal(&final_filter, &final_seasonal_irregular, stage)?;
        let final_corrected_seasonal_irregular =
            self.correct(&final_seasonal_irregular, &seasonal)?;

        // --- Table 10: final seasonal ---
        let mut seasonal = self.seasonal(
            &final_filter,
            &final_corrected_seasonal_irregular,
            table(TableKind::Seasonal),
        )?;
        extend_seasonal(&mut seasonal, stride);

        // --- Tables 11, 13: adjusted series and irregular ---
        let seasonally_adjusted = mode.remove(original, &seasonal);
        let irregular = mode.remove(&seasonally_adjusted, &trend);

        // --- Tables 17, 20: irregular weights and factors ---
        let extremes = self.corrector().analyse(&irregular)?;
        let weights = extremes.weights().to_vec();
        let correction_factors = extremes.irregular_factors();

        debug!(
            step = ?step,
            trend_length,
            seasonal_filter = option.name(),
            extremes = extremes.extreme_count(),
            "step complete"
        );

        Ok(StepTables {
            input: input.to_vec(),
            preliminary_trend,
            seasonal_irregular,
            corrected_seasonal_irregular,
            preliminary_seasonal,
            preliminary_adjusted,
            trend,
            final_seasonal_irregular,
            final_corrected_seasonal_irregular,
            seasonal,
            seasonally_adjusted,
            irregular,
            weights,
            correction_factors,
            trend_length,
            seasonal_filter: option,
            msr,
        })
    }

    /// Filters each seasonal position of `si` and normalises the result.
    fn seasonal(
        &self,
        filter: &SeasonalFilter,
        si: &[f64],
        stage: Table,
    ) -> Result<Vec<f64>, X11Error> {
        let raw = filter.apply(si, self.stride()).map_err(at(stage))?;
        self.normalizer
            .normalize(&raw, self.mode(), self.config.period())
    }

    /// Replaces the extremes of `si` found in its irregular part.
    fn correct(&self, si: &[f64], seasonal: &[f64]) -> Result<Vec<f64>, X11Error> {
        let irregular = self.mode().remove(si, seasonal);
        let corrections = self
            .corrector()
            .analyse(&irregular)?
            .compute_corrections(si)?;
        Ok(corrections.apply(si)?)
    }

    /// Chooses the trend length from the I/C ratio of a Henderson smooth of
    /// the preliminary adjusted series.
    fn auto_trend_length(&self, adjusted: &[f64], stage: Table) -> Result<usize, X11Error> {
        let mode = self.mode();
        let short = self.config.period() <= 4.0;
        let pilot = if short { 5 } else { 13 };
        let henderson = self.cache.henderson(pilot).map_err(at(stage))?;
        let trend = henderson
            .as_filter()
            .filter(adjusted)
            .map_err(at(stage))?;
        let h = henderson.half_length();
        let irregular = mode.remove(&adjusted[h..h + trend.len()], &trend);
        let ratio = mean_abs_change(&irregular, 1, mode)
            .zip(mean_abs_change(&trend, 1, mode))
            .and_then(|(i, c)| (c > 0.0).then(|| i / c));
        let mut length = match (ratio, short) {
            (None, true) => 5,
            (None, false) => 13,
            (Some(r), true) => {
                if r < 1.0 {
                    5
                } else {
                    7
                }
            }
            (Some(r), false) => {
                if r < 1.0 {
                    9
                } else if r < 3.5 {
                    13
                } else {
                    23
                }
            }
        };
        while length > adjusted.len() && length > pilot {
            length -= 2;
        }
        debug!(ratio, length, "trend length from I/C ratio");
        Ok(length)
    }
}

/// Minimum series length the configuration supports.
pub(crate) fn min_length(config: &X11Config, moving_average: &SymmetricFilter) -> usize {
    let trend = match config.trend_length() {
        TrendLength::Fixed(len) => len,
        TrendLength::Auto if config.period() <= 4.0 => 5,
        TrendLength::Auto => 13,
    };
    (2 * moving_average.half_length() + config.seasonal_stride()).max(trend)
}

/// Seasonal filter used for the preliminary estimates.
fn initial_option(option: SeasonalFilterOption) -> SeasonalFilterOption {
    match option {
        SeasonalFilterOption::X11Default | SeasonalFilterOption::Msr => {
            SeasonalFilterOption::S3x3
        }
        other => other,
    }
}

fn concrete(option: SeasonalFilterOption, stage: Table) -> Result<SeasonalFilter, X11Error> {
    option
        .fixed()
        .map_err(at(stage))?
        .ok_or_else(|| X11Error::InvalidConfiguration {
            reason: format!(
                "seasonal filter {} has no fixed form in table {}",
                option.name(),
                stage.name()
            ),
        })
}

fn at(stage: Table) -> impl Fn(FilterError) -> X11Error {
    move |source| X11Error::Filter {
        stage: stage.name(),
        source,
    }
}

/// Multiplicative trends must stay strictly positive.
fn check_trend(mode: DecompositionMode, stage: Table, trend: &[f64]) -> Result<(), X11Error> {
    if !mode.is_multiplicative() {
        return Ok(());
    }
    match trend
        .iter()
        .enumerate()
        .find(|(_, v)| v.is_finite() && **v <= 0.0)
    {
        Some((index, &value)) => Err(X11Error::NegativeTrend {
            stage: stage.name(),
            index,
            value,
        }),
        None => Ok(()),
    }
}

/// Fills the undefined ends of each seasonal position with the nearest
/// defined estimate at that position.
fn extend_seasonal(values: &mut [f64], stride: usize) {
    for pos in 0..stride.min(values.len()) {
        let indices: Vec<usize> = (pos..values.len()).step_by(stride).collect();
        let Some(first) = indices.iter().position(|&i| values[i].is_finite()) else {
            continue;
        };
        let last = indices
            .iter()
            .rposition(|&i| values[i].is_finite())
            .unwrap_or(first);
        let (head, tail) = (values[indices[first]], values[indices[last]]);
        for &i in &indices[..first] {
            values[i] = head;
        }
        for &i in &indices[last + 1..] {
            values[i] = tail;
        }
    }
}
