//! Decomposition results.

use seasadj_filters::SeasonalFilterOption;
use seasadj_stats::DecompositionMode;

use crate::table::{Step, Table, TableKind};

/// Every table computed by one step, all of the input length.
///
/// Positions a table does not define hold `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTables {
    pub(crate) input: Vec<f64>,
    pub(crate) preliminary_trend: Vec<f64>,
    pub(crate) seasonal_irregular: Vec<f64>,
    pub(crate) corrected_seasonal_irregular: Vec<f64>,
    pub(crate) preliminary_seasonal: Vec<f64>,
    pub(crate) preliminary_adjusted: Vec<f64>,
    pub(crate) trend: Vec<f64>,
    pub(crate) final_seasonal_irregular: Vec<f64>,
    pub(crate) final_corrected_seasonal_irregular: Vec<f64>,
    pub(crate) seasonal: Vec<f64>,
    pub(crate) seasonally_adjusted: Vec<f64>,
    pub(crate) irregular: Vec<f64>,
    pub(crate) weights: Vec<f64>,
    pub(crate) correction_factors: Vec<f64>,
    pub(crate) trend_length: usize,
    pub(crate) seasonal_filter: SeasonalFilterOption,
    pub(crate) msr: Option<f64>,
}

impl StepTables {
    /// Returns the table holding `kind`.
    pub fn get(&self, kind: TableKind) -> &[f64] {
        match kind {
            TableKind::Input => &self.input,
            TableKind::PreliminaryTrend => &self.preliminary_trend,
            TableKind::SeasonalIrregular => &self.seasonal_irregular,
            TableKind::CorrectedSeasonalIrregular => &self.corrected_seasonal_irregular,
            TableKind::PreliminarySeasonal => &self.preliminary_seasonal,
            TableKind::PreliminaryAdjusted => &self.preliminary_adjusted,
            TableKind::Trend => &self.trend,
            TableKind::FinalSeasonalIrregular => &self.final_seasonal_irregular,
            TableKind::FinalCorrectedSeasonalIrregular => {
                &self.final_corrected_seasonal_irregular
            }
            TableKind::Seasonal => &self.seasonal,
            TableKind::SeasonallyAdjusted => &self.seasonally_adjusted,
            TableKind::Irregular => &self.irregular,
            TableKind::Weights => &self.weights,
            TableKind::CorrectionFactors => &self.correction_factors,
        }
    }

    /// Length of the trend filter used for table 7.
    pub fn trend_length(&self) -> usize {
        self.trend_length
    }

    /// Seasonal filter used for tables 9 and 10.
    pub fn seasonal_filter(&self) -> SeasonalFilterOption {
        self.seasonal_filter
    }

    /// Moving seasonality ratio, when the final filter was selected from it.
    pub fn msr(&self) -> Option<f64> {
        self.msr
    }
}

/// Result of a B-step / C-step decomposition.
///
/// The final components come from the C step. In multiplicative mode
/// `trend * seasonal * irregular` reproduces the input wherever the trend is
/// defined; in additive mode the sum does.
#[derive(Debug, Clone, PartialEq)]
pub struct X11Result {
    pub(crate) mode: DecompositionMode,
    pub(crate) b: StepTables,
    pub(crate) c: StepTables,
}

impl X11Result {
    /// Decomposition mode of the run.
    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.b.input.len()
    }

    /// Returns `true` if the decomposed series was empty.
    pub fn is_empty(&self) -> bool {
        self.b.input.is_empty()
    }

    /// Original series (`b1`).
    pub fn original(&self) -> &[f64] {
        &self.b.input
    }

    /// Final trend (`c7`).
    pub fn trend(&self) -> &[f64] {
        &self.c.trend
    }

    /// Final seasonal factors (`c10`).
    pub fn seasonal(&self) -> &[f64] {
        &self.c.seasonal
    }

    /// Seasonally adjusted series (`c11`).
    pub fn seasonally_adjusted(&self) -> &[f64] {
        &self.c.seasonally_adjusted
    }

    /// Final irregular (`c13`).
    pub fn irregular(&self) -> &[f64] {
        &self.c.irregular
    }

    /// Extreme value weights of the final irregular (`c17`).
    pub fn weights(&self) -> &[f64] {
        &self.c.weights
    }

    /// Irregular replacement factors of the final irregular (`c20`).
    pub fn corrections(&self) -> &[f64] {
        &self.c.correction_factors
    }

    /// All tables of one step.
    pub fn step(&self, step: Step) -> &StepTables {
        match step {
            Step::B => &self.b,
            Step::C => &self.c,
        }
    }

    /// Any named table.
    pub fn table(&self, table: Table) -> &[f64] {
        self.step(table.step()).get(table.kind())
    }
}
