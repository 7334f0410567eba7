//! # Money Module
//!
//! Every amount in Folio is an integer count of centavos wrapped in
//! [`Money`]. Floats never carry a price: `0.1 + 0.2` is already wrong
//! in binary, and a shelf of 2500-centavo paperbacks split three ways
//! must come out as 833 + 833 + 833 with the lost centavo visible, not
//! smeared across rounding.
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::from_cents(2500);          // 25.00 MT
//! let pair = price * 2;                         // 50.00 MT
//! let total = price + Money::from_cents(500);   // 30.00 MT
//! assert_eq!(total.to_string(), "30.00");
//! ```
//!
//! There is deliberately no `from_float`. Amounts enter the system as
//! centavos and stay centavos until the display boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos, the smallest currency unit.
///
/// Signed so refunds and corrections can go below zero. The wrapper is a
/// single `i64`, so copies are free and the serde form is a bare number.
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Book.price_cents ──┬──► CartLine.unit_price ──► CartLine.line_total   │
/// │                     │                                                   │
/// │                     └──► ReservationItem.unit_price (frozen snapshot)  │
/// │                                                                         │
/// │  Cart.total ──► Reservation.total_amount ──► Sale.total_price          │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Wraps a centavo count.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let price = Money::from_cents(2500); // 25.00 MT
    /// assert_eq!(price.cents(), 2500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Builds an amount from whole meticais plus centavos.
    ///
    /// For negative amounts the sign rides on the major unit:
    /// `from_major_minor(-5, 50)` is -5.50 MT, not -4.50 MT.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(25, 50).cents(), 2550);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// The raw centavo count.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The whole-meticais portion, truncated toward zero.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// The centavo remainder, always in `0..=99` regardless of sign.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero centavos.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Whether the amount is exactly zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whether the amount is above zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Whether the amount is below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// The magnitude, sign dropped.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Scales a unit price into a line total.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2200);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 6600);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders with two decimals and thousands separators, e.g. `1,234.56`.
///
/// No currency symbol here. The "MT" label is presentation and gets
/// appended at the display boundary, not baked into the value type.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            group_thousands(self.units().abs()),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Inserts a comma every three digits, counting from the right.
/// `value` must be non-negative (the sign is handled by the caller).
fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_units_and_remainder() {
        let money = Money::from_cents(2550);
        assert_eq!(money.cents(), 2550);
        assert_eq!(money.units(), 25);
        assert_eq!(money.cents_part(), 50);

        let negative = Money::from_cents(-550);
        assert_eq!(negative.units(), -5);
        assert_eq!(negative.cents_part(), 50);
    }

    #[test]
    fn test_from_major_minor_sign_handling() {
        assert_eq!(Money::from_major_minor(25, 50).cents(), 2550);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
        assert_eq!(Money::from_major_minor(0, 99).cents(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(2550)), "25.50");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(format!("{}", Money::from_cents(123_456)), "1,234.56");
        assert_eq!(format!("{}", Money::from_cents(123_456_789)), "1,234,567.89");
        assert_eq!(format!("{}", Money::from_cents(-123_456)), "-1,234.56");
        assert_eq!(format!("{}", Money::from_cents(99_999)), "999.99");
    }

    #[test]
    fn test_arithmetic_stays_in_cents() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3i64).cents(), 3000);

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.cents(), 1500);
        acc -= b;
        assert_eq!(acc.cents(), 1000);
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
        assert_eq!(Money::from_cents(-100).abs().cents(), 100);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(2200);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 6600);
    }

    /// Splitting 25.00 MT three ways loses a centavo. The loss is
    /// visible in the integers instead of hidden in float rounding.
    #[test]
    fn test_division_precision_loss_is_visible() {
        let price = Money::from_cents(2500);
        let one_third = Money::from_cents(2500 / 3); // 833
        let reconstructed = one_third * 3i64; // 2499

        assert_eq!(reconstructed.cents(), 2499);
        assert_eq!((price - reconstructed).cents(), 1);
    }
}
