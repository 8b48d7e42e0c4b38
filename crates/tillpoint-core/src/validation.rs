//! # Validation Module
//!
//! Input validation for values a cashier types into the terminal.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal view                                                 │
//! │  └── Basic format checks, immediate feedback                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: CartStore (tillpoint-session)                                 │
//! │  └── THIS MODULE: discount range, quantity ceiling, note length         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: CartEngine                                                    │
//! │  └── Accepts anything; floors and clamps so the total stays >= 0        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tillpoint_core::validation::{validate_discount, validate_quantity};
//! use tillpoint_core::DiscountPolicy;
//!
//! assert!(validate_discount(&DiscountPolicy::percentage(2000)).is_ok());
//! assert!(validate_discount(&DiscountPolicy::percentage(12000)).is_err());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::DiscountPolicy;
use crate::{FULL_PERCENTAGE_BPS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Discount
// =============================================================================

/// Validates a discount policy before it is applied to the cart.
///
/// ## Rules
/// - Percentage: 0% to 100% (0..=10000 bps)
/// - Flat: must not be negative
///
/// A flat discount larger than the subtotal is allowed; the cart total
/// clamps at zero.
pub fn validate_discount(discount: &DiscountPolicy) -> ValidationResult<()> {
    match discount {
        DiscountPolicy::Percentage { value } if *value > FULL_PERCENTAGE_BPS => {
            Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: FULL_PERCENTAGE_BPS as i64,
            })
        }
        DiscountPolicy::Flat { value } if value.is_negative() => {
            Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: i64::MAX,
            })
        }
        _ => Ok(()),
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Validates a quantity typed into a cart line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// Cashier types 0 in the qty box ──► CartStore removes the line
///                                     (never reaches this function)
/// Cashier types 5                 ──► validate_quantity(5) → Ok
/// Cashier types 5000              ──► QuantityTooLarge { 5000, 999 }
/// ```
pub fn validate_quantity(qty: i64) -> CoreResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: qty,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Text Fields
// =============================================================================

/// Validates the free-text order note.
///
/// Empty notes are fine. Length is counted in characters, not bytes.
pub fn validate_note(note: &str, max_len: usize) -> ValidationResult<()> {
    if note.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: max_len,
        });
    }

    Ok(())
}

/// Validates a product id handed over by the catalogue.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if id.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "product id".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
