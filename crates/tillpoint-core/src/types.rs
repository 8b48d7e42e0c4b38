//! # Domain Types
//!
//! The shapes the cart consumes from the rest of the terminal.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────┐  ┌─────────────────────┐  │
//! │  │  ProductSnapshot    │  │  CustomerRef    │  │  DiscountPolicy     │  │
//! │  │  ─────────────────  │  │  ─────────────  │  │  ─────────────────  │  │
//! │  │  id                 │  │  id             │  │  Percentage(bps)    │  │
//! │  │  name?              │  │  name           │  │  Flat(cents)        │  │
//! │  │  selling_price?     │  │  phone?         │  │                     │  │
//! │  │  price?             │  │                 │  │  default: 0%        │  │
//! │  └─────────────────────┘  └─────────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and customers are owned by the backend catalogue; the cart only
//! keeps the copy it was handed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Snapshot
// =============================================================================

/// A product as the terminal saw it when the cashier scanned or clicked it.
///
/// The catalogue exposes two price fields. `selling_price` is the one the
/// store actually charges; `price` is the list price some catalogue entries
/// carry instead. Either may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSnapshot {
    /// Product identity. Two snapshots with the same id are the same product.
    pub id: String,

    /// Display name, if the catalogue sent one.
    #[serde(default)]
    pub name: Option<String>,

    /// Preferred price field.
    #[serde(default)]
    pub selling_price: Option<Money>,

    /// Fallback price field.
    #[serde(default)]
    pub price: Option<Money>,
}

impl ProductSnapshot {
    /// Creates a snapshot with no price fields at all.
    pub fn new(id: impl Into<String>) -> Self {
        ProductSnapshot {
            id: id.into(),
            name: None,
            selling_price: None,
            price: None,
        }
    }

    /// Creates a snapshot carrying only the preferred price field.
    pub fn with_selling_price(id: impl Into<String>, selling_price: Money) -> Self {
        ProductSnapshot {
            selling_price: Some(selling_price),
            ..ProductSnapshot::new(id)
        }
    }

    /// Creates a snapshot carrying only the fallback price field.
    pub fn with_price(id: impl Into<String>, price: Money) -> Self {
        ProductSnapshot {
            price: Some(price),
            ..ProductSnapshot::new(id)
        }
    }

    /// The price a new cart line captures for this product.
    ///
    /// ## Resolution Order
    /// 1. `selling_price`
    /// 2. `price`
    /// 3. zero
    ///
    /// A missing price never rejects the product; it rings up free.
    pub fn unit_price(&self) -> Money {
        self.selling_price.or(self.price).unwrap_or_default()
    }
}

// =============================================================================
// Customer Reference
// =============================================================================

/// The customer attached to the current checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        CustomerRef {
            id: id.into(),
            name: name.into(),
            phone: None,
        }
    }
}

// =============================================================================
// Discount Policy
// =============================================================================

/// How the order-level discount is computed from the subtotal.
///
/// ## Wire Shape
/// ```json
/// { "kind": "percentage", "value": 2000 }   // 20.00%, in basis points
/// { "kind": "flat",       "value": 1500 }   // $15.00, in cents
/// ```
///
/// ## Why Basis Points?
/// Cashiers type percentages like `12.5`. Storing 1250 bps keeps the value
/// exact and lets [`Money::percentage`] do the rounding in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountPolicy {
    /// A share of the subtotal, in basis points (10000 = 100%).
    Percentage { value: u32 },

    /// A fixed amount off the subtotal.
    Flat { value: Money },
}

impl DiscountPolicy {
    /// Percentage discount in basis points.
    #[inline]
    pub const fn percentage(bps: u32) -> Self {
        DiscountPolicy::Percentage { value: bps }
    }

    /// Flat amount discount.
    #[inline]
    pub const fn flat(amount: Money) -> Self {
        DiscountPolicy::Flat { value: amount }
    }

    /// No discount: percentage, zero.
    #[inline]
    pub const fn none() -> Self {
        DiscountPolicy::percentage(0)
    }

    /// Returns true if this policy can never take anything off.
    pub fn is_none(&self) -> bool {
        match self {
            DiscountPolicy::Percentage { value } => *value == 0,
            DiscountPolicy::Flat { value } => !value.is_positive(),
        }
    }

    /// Computes the discount amount for a given subtotal.
    ///
    /// ## Rules
    /// - Percentage: `subtotal × bps / 10000`, rounded half-up
    /// - Flat: the flat amount as-is, even when it exceeds the subtotal
    /// - Negative results floor to zero
    ///
    /// The cart clamps the *total*, not this amount, so a $150 flat discount
    /// on a $100 cart reports a $150 discount and a $0 total.
    pub fn amount_for(&self, subtotal: Money) -> Money {
        let raw = match self {
            DiscountPolicy::Percentage { value } => subtotal.percentage(*value),
            DiscountPolicy::Flat { value } => *value,
        };
        raw.non_negative()
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        DiscountPolicy::none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
