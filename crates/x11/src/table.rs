//! Names of the intermediate tables of the B and C steps.

/// Pass of the decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Preliminary pass on the original series.
    B,
    /// Final pass on the series corrected with the B-step irregular factors.
    C,
}

/// Content of a table, independent of the step that computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    /// Input of the step.
    Input,
    /// Centred moving-average trend.
    PreliminaryTrend,
    /// Input with the preliminary trend removed.
    SeasonalIrregular,
    /// Seasonal-irregular ratios after the first extreme value correction.
    CorrectedSeasonalIrregular,
    /// Normalised preliminary seasonal, extended to the full span.
    PreliminarySeasonal,
    /// Input with the preliminary seasonal removed.
    PreliminaryAdjusted,
    /// Trend filtered from the preliminary adjusted series.
    Trend,
    /// Input with the trend removed.
    FinalSeasonalIrregular,
    /// Final seasonal-irregular ratios after extreme value correction.
    FinalCorrectedSeasonalIrregular,
    /// Normalised final seasonal.
    Seasonal,
    /// Original series with the final seasonal removed.
    SeasonallyAdjusted,
    /// Seasonally adjusted series with the trend removed.
    Irregular,
    /// Extreme value weights of the irregular.
    Weights,
    /// Irregular replacement factors.
    CorrectionFactors,
}

impl TableKind {
    /// Number of the table within its step.
    pub fn number(self) -> u8 {
        match self {
            Self::Input => 1,
            Self::PreliminaryTrend => 2,
            Self::SeasonalIrregular => 3,
            Self::CorrectedSeasonalIrregular => 4,
            Self::PreliminarySeasonal => 5,
            Self::PreliminaryAdjusted => 6,
            Self::Trend => 7,
            Self::FinalSeasonalIrregular => 8,
            Self::FinalCorrectedSeasonalIrregular => 9,
            Self::Seasonal => 10,
            Self::SeasonallyAdjusted => 11,
            Self::Irregular => 13,
            Self::Weights => 17,
            Self::CorrectionFactors => 20,
        }
    }
}

macro_rules! tables {
    ($($variant:ident => ($step:ident, $kind:ident, $name:literal)),* $(,)?) => {
        /// One named table of the decomposition (`b1` … `c20`).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Table {
            $(
                #[doc = concat!("Table `", $name, "`.")]
                $variant,
            )*
        }

        impl Table {
            /// Every table, B step first.
            pub const ALL: &'static [Table] = &[$(Table::$variant),*];

            /// Table computed by `step` holding `kind`.
            pub fn new(step: Step, kind: TableKind) -> Self {
                match (step, kind) {
                    $((Step::$step, TableKind::$kind) => Table::$variant,)*
                }
            }

            /// Step computing this table.
            pub fn step(self) -> Step {
                match self {
                    $(Table::$variant => Step::$step,)*
                }
            }

            /// Content of this table.
            pub fn kind(self) -> TableKind {
                match self {
                    $(Table::$variant => TableKind::$kind,)*
                }
            }

            /// Lower-case name, e.g. `"c7"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Table::$variant => $name,)*
                }
            }
        }
    };
}

tables! {
    B1 => (B, Input, "b1"),
    B2 => (B, PreliminaryTrend, "b2"),
    B3 => (B, SeasonalIrregular, "b3"),
    B4 => (B, CorrectedSeasonalIrregular, "b4"),
    B5 => (B, PreliminarySeasonal, "b5"),
    B6 => (B, PreliminaryAdjusted, "b6"),
    B7 => (B, Trend, "b7"),
    B8 => (B, FinalSeasonalIrregular, "b8"),
    B9 => (B, FinalCorrectedSeasonalIrregular, "b9"),
    B10 => (B, Seasonal, "b10"),
    B11 => (B, SeasonallyAdjusted, "b11"),
    B13 => (B, Irregular, "b13"),
    B17 => (B, Weights, "b17"),
    B20 => (B, CorrectionFactors, "b20"),
    C1 => (C, Input, "c1"),
    C2 => (C, PreliminaryTrend, "c2"),
    C3 => (C, SeasonalIrregular, "c3"),
    C4 => (C, CorrectedSeasonalIrregular, "c4"),
    C5 => (C, PreliminarySeasonal, "c5"),
    C6 => (C, PreliminaryAdjusted, "c6"),
    C7 => (C, Trend, "c7"),
    C8 => (C, FinalSeasonalIrregular, "c8"),
    C9 => (C, FinalCorrectedSeasonalIrregular, "c9"),
    C10 => (C, Seasonal, "c10"),
    C11 => (C, SeasonallyAdjusted, "c11"),
    C13 => (C, Irregular, "c13"),
    C17 => (C, Weights, "c17"),
    C20 => (C, CorrectionFactors, "c20"),
}

impl Table {
    /// Parses a case-insensitive table name such as `"B7"` or `"c20"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.iter().copied().find(|t| t.name() == lower)
    }
}
