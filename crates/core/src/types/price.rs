//! Whole-rupee price representation.
//!
//! All monetary values in the system are whole-unit integers (rupees);
//! there is no fractional-unit handling anywhere. Keeping the amount in an
//! `i64` newtype makes cart and checkout arithmetic exact and keeps prices
//! from mixing with ordinary integers.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// A price in whole rupees.
///
/// Serializes as a bare number, which is also the wire shape the backend
/// stores.
///
/// ## Examples
///
/// ```
/// use rivaaj_core::Price;
///
/// let unit = Price::new(8_999);
/// let line_total = unit * 2;
/// assert_eq!(line_total, Price::new(17_998));
/// assert_eq!(unit.to_string(), "₨ 8,999");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole-rupee amount.
    #[must_use]
    pub const fn new(rupees: i64) -> Self {
        Self(rupees)
    }

    /// Get the amount in whole rupees.
    #[must_use]
    pub const fn as_rupees(&self) -> i64 {
        self.0
    }

    /// Whether this price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * i64::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    /// Formats as `₨ 1,234` with thousands grouping.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if self.0 < 0 {
            write!(f, "₨ -{grouped}")
        } else {
            write!(f, "₨ {grouped}")
        }
    }
}
