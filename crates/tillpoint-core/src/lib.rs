//! # tillpoint-core: Pure Cart Logic for Tillpoint
//!
//! This crate is the **heart** of the Tillpoint terminal. It owns the cart
//! pricing and mutation engine as plain data and pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillpoint Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    POS Terminal View                            │   │
//! │  │    Scan/Add ──► Cart Table ──► Discount/Customer ──► Checkout   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartSnapshot                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              tillpoint-session (CartStore, settings)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ tillpoint-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │CartEngine │  │   rules   │  │   │
//! │  │   │  Discount │  │  bps math │  │ LineItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO PERSISTENCE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product snapshots, customer references, discount policies
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart engine and its derived snapshot
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation used by hosting layers
//!
//! ## Example Usage
//!
//! ```rust
//! use tillpoint_core::{CartEngine, DiscountPolicy, Money, ProductSnapshot};
//!
//! let mut cart = CartEngine::new();
//! cart.add_item(&ProductSnapshot::with_selling_price("1", Money::from_cents(1000)));
//! cart.add_item(&ProductSnapshot::with_price("2", Money::from_cents(500)));
//! cart.add_item(&ProductSnapshot::with_selling_price("1", Money::from_cents(1000)));
//!
//! assert_eq!(cart.subtotal().cents(), 2500);
//!
//! cart.set_discount(DiscountPolicy::percentage(2000)); // 20%
//! assert_eq!(cart.total().cents(), 2000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartEngine, CartSnapshot, LineItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity a cashier may type for a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Enforced by hosting layers, not by the engine itself.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// One hundred percent, in basis points.
pub const FULL_PERCENTAGE_BPS: u32 = 10_000;

/// Default upper bound for the order note, in characters.
pub const DEFAULT_MAX_NOTE_LENGTH: usize = 500;
