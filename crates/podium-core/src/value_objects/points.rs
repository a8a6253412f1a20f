//! Points value object - activity score with safe arithmetic
//!
//! Scores are fractional (voice minutes accrue 0.1/min solo) so the
//! representation is f64, but the wrapper guarantees two properties the raw
//! type lacks: the value is never NaN, and a total ordering exists so points
//! can key a rank sort.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Non-NaN activity score. Subtraction saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Points(f64);

impl Points {
    pub const ZERO: Points = Points(0.0);

    /// Create from a raw value. NaN collapses to zero, negatives are clamped.
    pub fn new(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            Self(0.0)
        } else {
            Self(value)
        }
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Add a signed delta, flooring the result at zero
    pub fn saturating_add_signed(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }

    /// Difference to another score, floored at zero
    pub fn saturating_sub(self, other: Points) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl Eq for Points {}

impl PartialOrd for Points {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Points {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Values are never NaN, total_cmp matches numeric order
        self.0.total_cmp(&other.0)
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points::new(self.0 + rhs.0)
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        *self = *self + rhs;
    }
}

impl From<f64> for Points {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
