//! # Error Types
//!
//! Domain errors for the cart boundary.
//!
//! ## Where Errors Live
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Placement                                 │
//! │                                                                         │
//! │  CartEngine ───────────► never fails                                    │
//! │                          unknown line id  → no-op                       │
//! │                          missing price    → rings up at zero            │
//! │                          oversized discount → total clamps at zero      │
//! │                                                                         │
//! │  Hosting layer ────────► validates cashier input BEFORE the engine      │
//! │  (tillpoint-session)     ValidationError / CoreError                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by hosting layers when cashier input is refused.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
