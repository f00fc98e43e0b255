//! Seasonal moving averages applied per seasonal position.
//!
//! A `3xN` seasonal filter is the convolution of a 3-term and an `N`-term
//! simple average, applied to the subseries of one seasonal position
//! (stride = period). Near the ends of each subseries the matched end
//! filters take over:
//!
//! | Preset | Span | End filters |
//! |--------|------|-------------|
//! | `S3x1` | 3 | cut and normalise |
//! | `S3x3` | 5 | X-11 tables (denominator 27) |
//! | `S3x5` | 7 | X-11 tables (denominator 60) |
//! | `S3x9` | 11 | cut and normalise |
//! | `S3x15` | 17 | cut and normalise |
//! | `Stable` | all years | none, one mean per position |

use crate::endpoints::cut_and_normalize;
use crate::error::FilterError;
use crate::finite::FiniteFilter;
use crate::polynomial::convolve;
use crate::symmetric::SymmetricFilter;

/// Named seasonal filter selection.
///
/// `X11Default` uses `S3x3` for the preliminary estimate and `S3x5` for the
/// final one; `Msr` chooses the final filter from the moving seasonality
/// ratio. Both are resolved by the decomposition pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SeasonalFilterOption {
    /// 3x1 moving average.
    S3x1,
    /// 3x3 moving average.
    S3x3,
    /// 3x5 moving average.
    S3x5,
    /// 3x9 moving average.
    S3x9,
    /// 3x15 moving average.
    S3x15,
    /// One mean per seasonal position.
    Stable,
    /// 3x3 for the preliminary, 3x5 for the final estimate.
    #[default]
    X11Default,
    /// Final filter chosen from the moving seasonality ratio.
    Msr,
}

impl SeasonalFilterOption {
    /// Parses a preset from a case-insensitive name (`"S3x5"`, `"stable"`,
    /// `"x11default"`, `"msr"`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnsupportedName`] if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, FilterError> {
        match name.to_lowercase().as_str() {
            "s3x1" => Ok(Self::S3x1),
            "s3x3" => Ok(Self::S3x3),
            "s3x5" => Ok(Self::S3x5),
            "s3x9" => Ok(Self::S3x9),
            "s3x15" => Ok(Self::S3x15),
            "stable" => Ok(Self::Stable),
            "x11default" | "x11" => Ok(Self::X11Default),
            "msr" => Ok(Self::Msr),
            _ => Err(FilterError::UnsupportedName {
                kind: "seasonal filter",
                name: name.to_string(),
            }),
        }
    }

    /// Canonical name of the preset.
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3x1 => "S3x1",
            Self::S3x3 => "S3x3",
            Self::S3x5 => "S3x5",
            Self::S3x9 => "S3x9",
            Self::S3x15 => "S3x15",
            Self::Stable => "Stable",
            Self::X11Default => "X11Default",
            Self::Msr => "Msr",
        }
    }

    /// Concrete filter of a fixed preset, `None` for the adaptive ones.
    pub fn fixed(&self) -> Result<Option<SeasonalFilter>, FilterError> {
        let n = match self {
            Self::S3x1 => 1,
            Self::S3x3 => 3,
            Self::S3x5 => 5,
            Self::S3x9 => 9,
            Self::S3x15 => 15,
            Self::Stable => return Ok(Some(SeasonalFilter::Stable)),
            Self::X11Default | Self::Msr => return Ok(None),
        };
        Ok(Some(SeasonalFilter::MovingAverage(
            SeasonalMovingAverage::s3x(n)?,
        )))
    }
}

/// Seasonal filter ready to apply.
#[derive(Clone, Debug, PartialEq)]
pub enum SeasonalFilter {
    /// Moving average with matched end filters.
    MovingAverage(SeasonalMovingAverage),
    /// Mean of every seasonal position.
    Stable,
}

impl SeasonalFilter {
    /// Smooths every seasonal position of `input` independently.
    ///
    /// Position `i` belongs to subseries `i % period`. Leading and trailing
    /// `NaN`s of a subseries are left out and stay `NaN`; interior ones
    /// propagate through the moving averages and are skipped by `Stable`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`] if `period` is zero.
    pub fn apply(&self, input: &[f64], period: usize) -> Result<Vec<f64>, FilterError> {
        if period == 0 {
            return Err(FilterError::InvalidParameter {
                reason: "seasonal period must be positive".into(),
            });
        }
        let mut out = vec![f64::NAN; input.len()];
        for pos in 0..period.min(input.len()) {
            let sub: Vec<f64> = input.iter().skip(pos).step_by(period).copied().collect();
            let Some(first) = sub.iter().position(|v| v.is_finite()) else {
                continue;
            };
            let last = sub.iter().rposition(|v| v.is_finite()).unwrap_or(first);
            let smoothed = match self {
                Self::MovingAverage(ma) => ma.smooth(&sub[first..=last])?,
                Self::Stable => stable(&sub[first..=last]),
            };
            for (v, slot) in smoothed
                .into_iter()
                .zip(out.iter_mut().skip(pos + first * period).step_by(period))
            {
                *slot = v;
            }
        }
        Ok(out)
    }
}

fn stable(sub: &[f64]) -> Vec<f64> {
    let (sum, count) = sub
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
    vec![mean; sub.len()]
}

/// `3xN` seasonal moving average with its end filters.
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonalMovingAverage {
    symmetric: SymmetricFilter,
    ends: Vec<FiniteFilter>,
}

impl SeasonalMovingAverage {
    /// Builds the `3 x n` moving average.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidLength`] if `n` is even.
    pub fn s3x(n: usize) -> Result<Self, FilterError> {
        if n % 2 == 0 {
            return Err(FilterError::InvalidLength { length: n, min: 1 });
        }
        let weights = convolve(&[1.0 / 3.0; 3], &vec![1.0 / n as f64; n]);
        let h = weights.len() / 2;
        let half: Vec<f64> = (0..=h)
            .map(|k| 0.5 * (weights[h + k] + weights[h - k]))
            .collect();
        let symmetric = SymmetricFilter::from_half(&half)?;
        let ends = match n {
            3 => table(&[&[5.0, 11.0, 11.0], &[3.0, 7.0, 10.0, 7.0]], 27.0),
            5 => table(
                &[
                    &[9.0, 17.0, 17.0, 17.0],
                    &[4.0, 11.0, 15.0, 15.0, 15.0],
                    &[2.0, 7.0, 12.0, 13.0, 13.0, 13.0],
                ],
                60.0,
            ),
            _ => (0..h)
                .map(|q| cut_and_normalize(&symmetric, q))
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(Self { symmetric, ends })
    }

    /// Interior filter.
    pub fn symmetric(&self) -> &SymmetricFilter {
        &self.symmetric
    }

    /// End filter with `q` future observations (lags `-h..=q`).
    pub fn end_filter(&self, q: usize) -> Option<&FiniteFilter> {
        self.ends.get(q)
    }

    /// Smooths one seasonal subseries.
    ///
    /// Subseries too short for either end filter use the truncated and
    /// renormalised interior weights.
    pub fn smooth(&self, sub: &[f64]) -> Result<Vec<f64>, FilterError> {
        let y = sub.len();
        let h = self.symmetric.half_length();
        (0..y)
            .map(|i| {
                let past = i.min(h);
                let future = (y - 1 - i).min(h);
                let value = if past == h && future == h {
                    self.symmetric.as_filter().value_at(sub, i)
                } else if past == h {
                    self.ends[future].value_at(sub, i)
                } else if future == h {
                    self.ends[past].mirror().value_at(sub, i)
                } else {
                    truncated(&self.symmetric, past, future)?.value_at(sub, i)
                };
                Ok(value.unwrap_or(f64::NAN))
            })
            .collect()
    }
}

fn table(rows: &[&[f64]], denominator: f64) -> Vec<FiniteFilter> {
    let h = rows.len() as i32;
    rows.iter()
        .map(|row| {
            FiniteFilter::from_parts(-h, row.iter().map(|w| w / denominator).collect())
        })
        .collect()
}

fn truncated(
    symmetric: &SymmetricFilter,
    past: usize,
    future: usize,
) -> Result<FiniteFilter, FilterError> {
    FiniteFilter::from_fn(-(past as i32), future as i32, |j: i32| symmetric.weight(j))?
        .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn preset_names() {
        for p in [
            SeasonalFilterOption::S3x1,
            SeasonalFilterOption::S3x3,
            SeasonalFilterOption::S3x5,
            SeasonalFilterOption::S3x9,
            SeasonalFilterOption::S3x15,
            SeasonalFilterOption::Stable,
            SeasonalFilterOption::X11Default,
            SeasonalFilterOption::Msr,
        ] {
            assert_eq!(SeasonalFilterOption::from_name(p.name()).unwrap(), p);
        }
        assert!(SeasonalFilterOption::from_name("S3x7").is_err());
    }

    #[test]
    fn s3x3_weights() {
        let f = SeasonalMovingAverage::s3x(3).unwrap();
        let expected = [1.0, 2.0, 3.0, 2.0, 1.0].map(|v| v / 9.0);
        for (a, b) in f.symmetric().weights().iter().zip(&expected) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(f.end_filter(0).unwrap().weight(0), 11.0 / 27.0, epsilon = 1e-15);
    }

    #[test]
    fn every_end_filter_sums_to_one() {
        for n in [1, 3, 5, 9, 15] {
            let f = SeasonalMovingAverage::s3x(n).unwrap();
            let h = f.symmetric().half_length();
            for q in 0..h {
                let e = f.end_filter(q).unwrap();
                assert_eq!(e.lower_bound(), -(h as i32));
                assert_eq!(e.upper_bound(), q as i32);
                assert_abs_diff_eq!(e.sum(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn constant_positions_are_preserved() {
        let period = 4;
        let x: Vec<f64> = (0..40).map(|t| [1.1, 0.9, 1.2, 0.8][t % period]).collect();
        for option in [
            SeasonalFilterOption::S3x1,
            SeasonalFilterOption::S3x3,
            SeasonalFilterOption::S3x5,
            SeasonalFilterOption::S3x9,
            SeasonalFilterOption::S3x15,
            SeasonalFilterOption::Stable,
        ] {
            let s = option.fixed().unwrap().unwrap().apply(&x, period).unwrap();
            for (a, b) in s.iter().zip(&x) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn short_subseries_use_truncated_weights() {
        // two years only: every point is short on both sides of a 3x5
        let f = SeasonalMovingAverage::s3x(5).unwrap();
        let s = f.smooth(&[1.0, 3.0]).unwrap();
        let w0 = f.symmetric().weight(0);
        let w1 = f.symmetric().weight(1);
        assert_abs_diff_eq!(s[0], (w0 * 1.0 + w1 * 3.0) / (w0 + w1), epsilon = 1e-12);
        assert_abs_diff_eq!(s[1], (w1 * 1.0 + w0 * 3.0) / (w0 + w1), epsilon = 1e-12);
    }

    #[test]
    fn stable_skips_missing_values() {
        let s = SeasonalFilter::Stable
            .apply(&[1.0, 10.0, f64::NAN, 20.0, 3.0, 30.0], 2)
            .unwrap();
        assert_eq!(s, vec![2.0, 20.0, 2.0, 20.0, 2.0, 20.0]);
    }

    #[test]
    fn undefined_ends_are_skipped() {
        let mut x = vec![2.0; 24];
        x[0] = f64::NAN;
        x[23] = f64::NAN;
        let s = SeasonalFilterOption::S3x3
            .fixed()
            .unwrap()
            .unwrap()
            .apply(&x, 4)
            .unwrap();
        assert!(s[0].is_nan());
        assert!(s[23].is_nan());
        for v in &s[1..23] {
            assert_abs_diff_eq!(*v, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn adaptive_presets_have_no_fixed_filter() {
        assert!(SeasonalFilterOption::Msr.fixed().unwrap().is_none());
        assert!(SeasonalFilterOption::X11Default.fixed().unwrap().is_none());
    }
}
