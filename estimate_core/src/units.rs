//! # Unit Types
//!
//! Integer newtypes for the building dimensions the estimator works in.
//! Metal building sizes are sold in whole feet, so these wrap integers
//! rather than floats, and every area or perimeter derived from them is exact.
//!
//! Lengths are `u32`; areas and linear runs derived from them are `u64`, so
//! `Feet × Feet` cannot overflow for any pair of lengths.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::units::{Feet, SqFt};
//!
//! let area = Feet(24) * Feet(30);
//! assert_eq!(area, SqFt(720));
//! ```

use std::fmt;
use std::ops::{Add, Mul, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub u32);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub u32);

/// Linear footage (gutter runs, trim runs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinFt(pub u64);

// ============================================================================
// Area Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub u64);

impl Mul for Feet {
    type Output = SqFt;
    fn mul(self, rhs: Feet) -> SqFt {
        SqFt(u64::from(self.0) * u64::from(rhs.0))
    }
}

impl Feet {
    /// Perimeter of a rectangle with this side and `other`
    pub fn perimeter_with(self, other: Feet) -> LinFt {
        LinFt(2 * (u64::from(self.0) + u64::from(other.0)))
    }
}

impl fmt::Display for Feet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'", self.0)
    }
}

impl fmt::Display for SqFt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sq ft", self.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty, $inner:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0.saturating_add(rhs.0))
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0.saturating_sub(rhs.0))
            }
        }

        impl $type {
            /// Get the raw value
            pub fn value(self) -> $inner {
                self.0
            }

            /// Value as an exact decimal, for multiplying against rates
            pub fn as_decimal(self) -> Decimal {
                Decimal::from(self.0)
            }
        }
    };
}

impl_arithmetic!(Feet, u32);
impl_arithmetic!(Inches, u32);
impl_arithmetic!(LinFt, u64);
impl_arithmetic!(SqFt, u64);
