use std::fmt;
use std::ops::*;

/// Zoom factor: the number of screen pixels per world pixel.
///
/// Every constructor clamps into `[Zoom::MIN, Zoom::MAX]`, so a `Zoom` can
/// never leave that range no matter how it is produced.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Zoom {
    factor: f64,
}
impl Default for Zoom {
    fn default() -> Self {
        Self::ONE
    }
}
impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.factor)
    }
}

impl Zoom {
    /// The lower zoom limit; i.e. the furthest the user can zoom out.
    pub const MIN: f64 = 0.001;
    /// The upper zoom limit; i.e. the furthest the user can zoom in.
    pub const MAX: f64 = 16.0;

    /// One screen pixel per world pixel.
    pub const ONE: Self = Self { factor: 1.0 };

    /// Creates a `Zoom` from a factor, clamping it to the zoom limits.
    ///
    /// `NaN` clamps to the lower limit.
    pub fn from_factor(factor: f64) -> Self {
        let factor = if factor.is_nan() {
            Self::MIN
        } else {
            factor.max(Self::MIN).min(Self::MAX)
        };
        Self { factor }
    }

    /// Returns the zoom factor.
    pub fn factor(self) -> f64 {
        self.factor
    }
    /// Returns the base-2 logarithm of the zoom factor.
    pub fn log2_factor(self) -> f64 {
        self.factor.log2()
    }

    /// Returns `true` if the zoom is pinned at either limit.
    pub fn is_saturated(self) -> bool {
        self.factor <= Self::MIN || self.factor >= Self::MAX
    }

    /// Rounds the zoom factor to the nearest power of 2.
    #[must_use = "This method returns a new value instead of mutating its input"]
    pub fn round(self) -> Self {
        Self::from_factor(self.log2_factor().round().exp2())
    }
}

impl Mul<f64> for Zoom {
    type Output = Self;

    /// Zooms in by a factor.
    fn mul(self, factor: f64) -> Self {
        Self::from_factor(self.factor * factor)
    }
}
impl MulAssign<f64> for Zoom {
    /// Zooms in by a factor.
    fn mul_assign(&mut self, factor: f64) {
        *self = *self * factor;
    }
}

impl Div<f64> for Zoom {
    type Output = Self;

    /// Zooms out by a factor.
    fn div(self, factor: f64) -> Self {
        Self::from_factor(self.factor / factor)
    }
}
impl DivAssign<f64> for Zoom {
    /// Zooms out by a factor.
    fn div_assign(&mut self, factor: f64) {
        *self = *self / factor;
    }
}

impl Div<Zoom> for Zoom {
    type Output = f64;

    /// Computes the ratio between two zoom levels.
    fn div(self, other: Self) -> f64 {
        self.factor / other.factor
    }
}
