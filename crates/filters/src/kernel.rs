//! Discrete symmetric kernels for local-polynomial trend filters.

use crate::error::FilterError;

/// Kernel used to weight observations in a local-polynomial fit.
///
/// For a half-window `h` the kernel is sampled at `x = j / (h + 1)`,
/// `j = -h..=h`, so every lag inside the window gets a positive weight.
///
/// | Kernel | `K(x)` |
/// |--------|--------|
/// | [`Kernel::Uniform`] | `1` |
/// | [`Kernel::Triangular`] | `1 - |x|` |
/// | [`Kernel::Parabolic`] | `1 - x²` (Epanechnikov) |
/// | [`Kernel::Biweight`] | `(1 - x²)²` |
/// | [`Kernel::Triweight`] | `(1 - x²)³` |
/// | [`Kernel::Tricube`] | `(1 - |x|³)³` |
/// | [`Kernel::Gaussian`] | `exp(-2x²)` |
/// | [`Kernel::Henderson`] | `[(h+1)² - j²][(h+2)² - j²][(h+3)² - j²]` |
///
/// Henderson with a local polynomial of degree 2 or 3 reproduces the
/// closed-form Henderson filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Kernel {
    /// Equal weights.
    Uniform,
    /// Linearly decreasing weights.
    Triangular,
    /// Epanechnikov weights.
    Parabolic,
    /// Quartic weights.
    Biweight,
    /// Sextic weights.
    Triweight,
    /// Tricube weights.
    Tricube,
    /// Truncated Gaussian weights.
    Gaussian,
    /// Henderson's smoothness-optimal weights.
    #[default]
    Henderson,
}

impl Kernel {
    /// Parses a kernel from a case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnsupportedName`] if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, FilterError> {
        match name.to_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "triangular" => Ok(Self::Triangular),
            "parabolic" | "epanechnikov" => Ok(Self::Parabolic),
            "biweight" => Ok(Self::Biweight),
            "triweight" => Ok(Self::Triweight),
            "tricube" => Ok(Self::Tricube),
            "gaussian" => Ok(Self::Gaussian),
            "henderson" => Ok(Self::Henderson),
            _ => Err(FilterError::UnsupportedName {
                kind: "kernel",
                name: name.to_string(),
            }),
        }
    }

    /// Canonical name of the kernel.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::Triangular => "Triangular",
            Self::Parabolic => "Parabolic",
            Self::Biweight => "Biweight",
            Self::Triweight => "Triweight",
            Self::Tricube => "Tricube",
            Self::Gaussian => "Gaussian",
            Self::Henderson => "Henderson",
        }
    }

    /// Unnormalised kernel weight at lag `j` of a window with half-width `h`.
    ///
    /// Lags outside `-h..=h` get weight zero.
    pub fn weight(&self, j: i32, h: usize) -> f64 {
        let a = j.unsigned_abs() as usize;
        if a > h {
            return 0.0;
        }
        let x = a as f64 / (h as f64 + 1.0);
        match self {
            Self::Uniform => 1.0,
            Self::Triangular => 1.0 - x,
            Self::Parabolic => 1.0 - x * x,
            Self::Biweight => (1.0 - x * x).powi(2),
            Self::Triweight => (1.0 - x * x).powi(3),
            Self::Tricube => (1.0 - x * x * x).powi(3),
            Self::Gaussian => (-2.0 * x * x).exp(),
            Self::Henderson => {
                let j2 = (a * a) as f64;
                let h1 = (h + 1) as f64;
                let h2 = (h + 2) as f64;
                let h3 = (h + 3) as f64;
                (h1 * h1 - j2) * (h2 * h2 - j2) * (h3 * h3 - j2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Kernel; 8] = [
        Kernel::Uniform,
        Kernel::Triangular,
        Kernel::Parabolic,
        Kernel::Biweight,
        Kernel::Triweight,
        Kernel::Tricube,
        Kernel::Gaussian,
        Kernel::Henderson,
    ];

    #[test]
    fn default_is_henderson() {
        assert_eq!(Kernel::default(), Kernel::Henderson);
    }

    #[test]
    fn from_name_round_trips_canonical_names() {
        for k in ALL {
            assert_eq!(Kernel::from_name(k.name()).unwrap(), k);
            assert_eq!(Kernel::from_name(&k.name().to_uppercase()).unwrap(), k);
        }
        assert_eq!(Kernel::from_name("epanechnikov").unwrap(), Kernel::Parabolic);
    }

    #[test]
    fn from_name_invalid() {
        let err = Kernel::from_name("cosine").unwrap_err();
        assert!(matches!(
            err,
            FilterError::UnsupportedName { kind: "kernel", ref name } if name == "cosine"
        ));
    }

    #[test]
    fn weights_positive_symmetric_and_decreasing() {
        for k in ALL {
            let h = 6;
            for j in 0..=h as i32 {
                let w = k.weight(j, h);
                assert!(w > 0.0, "{k:?} weight at {j} must be positive");
                assert_eq!(w, k.weight(-j, h));
                if j > 0 {
                    assert!(w <= k.weight(j - 1, h), "{k:?} must not increase");
                }
            }
            assert_eq!(k.weight(h as i32 + 1, h), 0.0);
        }
    }
}
