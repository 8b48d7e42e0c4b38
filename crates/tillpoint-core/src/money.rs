//! # Money Module
//!
//! Provides the `Money` type used for every price, subtotal, discount and
//! total in the cart.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CART MATH IN FLOATING POINT                                            │
//! │                                                                         │
//! │    3 × $0.10 + $0.20 = 0.5000000000000001  ❌                            │
//! │    20% of $19.99     = 3.998                → which cent?               │
//! │                                                                         │
//! │  CART MATH IN CENTS                                                     │
//! │    3 × 10 + 20       = 50 cents             ✅                          │
//! │    20% of 1999 cents = (1999 × 2000 + 5000) / 10000 = 400 cents         │
//! │                        (half-up, decided once, here)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tillpoint_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price * 3_i64;            // $32.97
//! let off = line.percentage(1000);     // 10% → $3.30
//! assert_eq!((line - off).cents(), 2967);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: a flat discount typed as a negative number must be
///   representable so the engine can floor it, not reject it
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a bare integer**: the frontend sees `1099`, not `{...}`
///
/// ## Where Money Flows
/// ```text
/// ProductSnapshot.selling_price ─┐
///                                ├──► LineItem.unit_price ──► line_total
/// ProductSnapshot.price ─────────┘                              │
///                                                               ▼
///            DiscountPolicy ──► discount_amount ◄──────── subtotal
///                                     │                         │
///                                     └────────► total = max(0, subtotal − discount)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors negative values to zero.
    ///
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-250).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(250).non_negative().cents(), 250);
    /// ```
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies a unit price by a line quantity, saturating at the `i64`
    /// bounds instead of overflowing.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `bps` basis points of this amount, rounded half-up.
    ///
    /// Shares beyond the `i64` range saturate.
    ///
    /// ## Arguments
    /// * `bps` - Share in basis points (2000 = 20%, 10000 = 100%)
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00
    /// assert_eq!(subtotal.percentage(2000).cents(), 2000); // 20% → $20.00
    ///
    /// // $19.99 × 20% = $3.998 → $4.00
    /// assert_eq!(Money::from_cents(1999).percentage(2000).cents(), 400);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // i128 keeps large subtotals times large bps from overflowing
        let share = (self.0 as i128 * bps as i128 + 5000).div_euclid(10000);
        let cents = i64::try_from(share).unwrap_or(if share < 0 { i64::MIN } else { i64::MAX });
        Money::from_cents(cents)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-grade display (`$10.99`, `-$5.50`).
///
/// Terminal views format through `TerminalSettings::format_currency` so the
/// configured symbol and decimals apply.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

// Cart arithmetic saturates so that no quantity or price can make a read panic.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
