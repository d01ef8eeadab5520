//! Time representation for the virtual timeline
//!
//! Uses rational numbers to avoid floating-point accumulation errors when
//! summing clip lengths across a whole project. All values are seconds.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point in time or a duration, in seconds.
/// Uses rational arithmetic so prefix sums stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seconds {
    /// Value as a rational number (seconds)
    value: Rational64,
}

impl Seconds {
    /// Create from numerator and denominator: `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Const constructor. `numerator / denominator` must already be reduced.
    #[inline]
    pub const fn from_raw(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new_raw(numerator, denominator),
        }
    }

    /// Whole seconds.
    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        Self::new(secs, 1)
    }

    /// Milliseconds.
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Self::new(millis, 1000)
    }

    /// Create from seconds as a float.
    /// Note: may introduce small precision errors.
    pub fn from_secs_f64(seconds: f64) -> Self {
        const PRECISION: i64 = 1_000_000;
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_secs_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this value is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Check if this value is negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.value < Rational64::new_raw(0, 1)
    }

    /// Subtraction clamped at zero.
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        let diff = self - rhs;
        if diff.is_negative() {
            Self::ZERO
        } else {
            diff
        }
    }

    /// Clamp into `[lo, hi]`. `lo` wins when the bounds cross.
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        if self < lo {
            lo
        } else if self > hi {
            hi
        } else {
            self
        }
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Seconds {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for Seconds {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_secs_f64())
    }
}
