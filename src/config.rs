use serde::Deserialize;

/// Top-level seasonal adjustment configuration.
///
/// Every field has a default, so an empty file describes the classic
/// monthly multiplicative X11 run.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasadjConfig {
    /// Decomposition mode name (`multiplicative` or `additive`).
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Number of observations per seasonal cycle.
    #[serde(default = "default_period")]
    pub period: f64,

    /// Trend filter settings.
    #[serde(default)]
    pub trend: TrendToml,

    /// Seasonal filter settings.
    #[serde(default)]
    pub seasonal: SeasonalToml,

    /// Extreme value settings.
    #[serde(default)]
    pub extremes: ExtremesToml,
}

impl Default for SeasadjConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            period: default_period(),
            trend: TrendToml::default(),
            seasonal: SeasonalToml::default(),
            extremes: ExtremesToml::default(),
        }
    }
}

fn default_mode() -> String {
    "multiplicative".to_string()
}
fn default_period() -> f64 {
    12.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendToml {
    #[serde(default = "default_trend_length")]
    pub length: usize,
    #[serde(default)]
    pub auto_length: bool,
    #[serde(default = "default_kernel")]
    pub kernel: String,
    #[serde(default = "default_degree")]
    pub degree: usize,
    #[serde(default = "default_end_points")]
    pub left_end_points: String,
    #[serde(default = "default_end_points")]
    pub right_end_points: String,
}

impl Default for TrendToml {
    fn default() -> Self {
        Self {
            length: default_trend_length(),
            auto_length: false,
            kernel: default_kernel(),
            degree: default_degree(),
            left_end_points: default_end_points(),
            right_end_points: default_end_points(),
        }
    }
}

fn default_trend_length() -> usize {
    13
}
fn default_kernel() -> String {
    "henderson".to_string()
}
fn default_degree() -> usize {
    3
}
fn default_end_points() -> String {
    "lc".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonalToml {
    #[serde(default = "default_initial_seasonal")]
    pub initial: String,
    #[serde(rename = "final", default = "default_final_seasonal")]
    pub final_filter: String,
}

impl Default for SeasonalToml {
    fn default() -> Self {
        Self {
            initial: default_initial_seasonal(),
            final_filter: default_final_seasonal(),
        }
    }
}

fn default_initial_seasonal() -> String {
    "s3x3".to_string()
}
fn default_final_seasonal() -> String {
    "s3x5".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtremesToml {
    #[serde(default = "default_lower_sigma")]
    pub lower_sigma: f64,
    #[serde(default = "default_upper_sigma")]
    pub upper_sigma: f64,
}

impl Default for ExtremesToml {
    fn default() -> Self {
        Self {
            lower_sigma: default_lower_sigma(),
            upper_sigma: default_upper_sigma(),
        }
    }
}

fn default_lower_sigma() -> f64 {
    1.5
}
fn default_upper_sigma() -> f64 {
    2.5
}
