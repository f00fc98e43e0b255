//! Multiplicative / additive decomposition algebra.

/// Decomposition mode.
///
/// Every pipeline stage composes and separates components through
/// [`combine`](Self::combine) and [`remove`](Self::remove); no stage branches
/// on the mode itself.
///
/// | Mode | `combine(a, b)` | `remove(a, b)` | centre |
/// |------|-----------------|----------------|--------|
/// | `Multiplicative` | `a * b` | `a / b` | 1 |
/// | `Additive` | `a + b` | `a - b` | 0 |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DecompositionMode {
    /// `Y = T * S * I`.
    #[default]
    Multiplicative,
    /// `Y = T + S + I`.
    Additive,
}

impl DecompositionMode {
    /// Parses a mode from a case-insensitive name (`"multiplicative"`,
    /// `"mult"`, `"additive"`, `"add"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "multiplicative" | "mult" => Some(Self::Multiplicative),
            "additive" | "add" => Some(Self::Additive),
            _ => None,
        }
    }

    /// Returns `true` for [`DecompositionMode::Multiplicative`].
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::Multiplicative)
    }

    /// Neutral value of a seasonal or irregular component.
    pub fn center(self) -> f64 {
        match self {
            Self::Multiplicative => 1.0,
            Self::Additive => 0.0,
        }
    }

    /// Composes two values.
    #[inline]
    pub fn combine_value(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Multiplicative => a * b,
            Self::Additive => a + b,
        }
    }

    /// Separates `b` out of `a`.
    #[inline]
    pub fn remove_value(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Multiplicative => a / b,
            Self::Additive => a - b,
        }
    }

    /// Signed distance of a component value from the neutral value.
    #[inline]
    pub fn deviation(self, x: f64) -> f64 {
        x - self.center()
    }

    /// Moves `x` towards the neutral value, keeping a fraction `w` of its
    /// deviation (`w = 1` leaves `x` unchanged, `w = 0` returns the centre).
    #[inline]
    pub fn shrink(self, x: f64, w: f64) -> f64 {
        self.center() + w * self.deviation(x)
    }

    /// Element-wise [`combine_value`](Self::combine_value). Both operands
    /// must have the same length.
    pub fn combine(self, a: &[f64], b: &[f64]) -> Vec<f64> {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .map(|(&x, &y)| self.combine_value(x, y))
            .collect()
    }

    /// Element-wise [`remove_value`](Self::remove_value). Both operands must
    /// have the same length.
    pub fn remove(self, a: &[f64], b: &[f64]) -> Vec<f64> {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .map(|(&x, &y)| self.remove_value(x, y))
            .collect()
    }
}
