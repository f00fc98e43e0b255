//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, anyhow};

use seasadj_filters::{EndPointMethod, Kernel, SeasonalFilterOption};
use seasadj_stats::DecompositionMode;
use seasadj_x11::{TrendLength, X11Config};

use crate::config::SeasadjConfig;

/// Parses a decomposition mode name.
pub fn parse_mode(s: &str) -> Result<DecompositionMode> {
    DecompositionMode::from_name(s).ok_or_else(|| anyhow!("unknown decomposition mode: {s:?}"))
}

/// Parses an end-point method name; `"none"` disables that end.
pub fn parse_end_points(s: &str) -> Result<Option<EndPointMethod>> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(EndPointMethod::from_name(s)?))
}

/// Builds an [`X11Config`] from the TOML configuration.
///
/// `mode` and `period` replace the file values when given.
pub fn build_x11_config(
    config: &SeasadjConfig,
    mode: Option<&str>,
    period: Option<f64>,
) -> Result<X11Config> {
    let mode = parse_mode(mode.unwrap_or(&config.mode))?;
    let period = period.unwrap_or(config.period);
    let trend = &config.trend;
    let trend_length = if trend.auto_length {
        TrendLength::Auto
    } else {
        TrendLength::Fixed(trend.length)
    };
    let kernel = Kernel::from_name(&trend.kernel).context("invalid [trend].kernel")?;
    let left = parse_end_points(&trend.left_end_points).context("invalid [trend].left_end_points")?;
    let right =
        parse_end_points(&trend.right_end_points).context("invalid [trend].right_end_points")?;
    let initial = SeasonalFilterOption::from_name(&config.seasonal.initial)
        .context("invalid [seasonal].initial")?;
    let final_filter = SeasonalFilterOption::from_name(&config.seasonal.final_filter)
        .context("invalid [seasonal].final")?;

    let x11 = X11Config::new(mode, period)
        .with_trend_length(trend_length)
        .with_kernel(kernel)
        .with_degree(trend.degree)
        .with_end_points(left, right)
        .with_initial_seasonal(initial)
        .with_final_seasonal(final_filter)
        .with_sigma_limits(config.extremes.lower_sigma, config.extremes.upper_sigma);
    x11.validate()?;
    Ok(x11)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_classic_config() {
        let config = build_x11_config(&SeasadjConfig::default(), None, None).unwrap();
        assert_eq!(config, X11Config::default());
    }

    #[test]
    fn cli_overrides_mode_and_period() {
        let config =
            build_x11_config(&SeasadjConfig::default(), Some("additive"), Some(4.0)).unwrap();
        assert_eq!(config.mode(), DecompositionMode::Additive);
        assert_eq!(config.period(), 4.0);
    }

    #[test]
    fn none_disables_end_points() {
        assert_eq!(parse_end_points("NONE").unwrap(), None);
        assert_eq!(parse_end_points("daf").unwrap(), Some(EndPointMethod::Daf));
        assert!(parse_end_points("xyz").is_err());
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(parse_mode("log").is_err());
        let mut config = SeasadjConfig::default();
        config.seasonal.final_filter = "s3x7".to_string();
        let err = build_x11_config(&config, None, None).unwrap_err();
        assert!(format!("{err:#}").contains("[seasonal].final"));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut config = SeasadjConfig::default();
        config.trend.length = 12;
        assert!(build_x11_config(&config, None, None).is_err());
    }
}
