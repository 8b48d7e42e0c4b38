//! # Cart State
//!
//! Shares the current checkout's [`CartEngine`] with the terminal views and
//! publishes a [`CartEvent`] after every change.
//!
//! ## Thread Safety
//! The engine is wrapped in `Arc<Mutex<T>>`:
//! 1. Several views hold a handle to the same cart
//! 2. Only one mutation may run at a time
//! 3. Each mutation updates state, builds the snapshot and publishes the
//!    event before the lock is released, so events arrive in mutation order
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  View Action            CartStore                  Boundary Check       │
//! │  ───────────            ─────────                  ──────────────       │
//! │                                                                         │
//! │  Scan product ────────► add_item() ──────────────► product id present  │
//! │  Type quantity ───────► set_quantity() ──────────► 1..=999 (<=0 drops) │
//! │  Click remove ────────► remove_item() ───────────► none                │
//! │  Pick customer ───────► set_customer() ──────────► none                │
//! │  Apply discount ──────► set_discount() ──────────► 0..=100% / >= 0     │
//! │  Type note ───────────► set_note() ──────────────► max_note_length     │
//! │  Checkout done ───────► clear() ─────────────────► none                │
//! │                                                                         │
//! │  Every accepted change ──► CartEvent { kind, snapshot } ──► subscribers │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use tillpoint_core::validation::{
    validate_discount, validate_note, validate_product_id, validate_quantity,
};
use tillpoint_core::{
    CartEngine, CartSnapshot, CustomerRef, DiscountPolicy, ProductSnapshot,
    DEFAULT_MAX_NOTE_LENGTH,
};

use crate::error::SessionResult;
use crate::state::settings::SettingsHub;

/// Capacity of the cart event channel.
const CART_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Events
// =============================================================================

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEventKind {
    ItemAdded { line_id: String, product_id: String },
    ItemRemoved { line_id: String },
    QuantityChanged { line_id: String, quantity: i64 },
    CustomerChanged,
    DiscountChanged,
    NoteChanged,
    Cleared,
}

/// Published after a cart change, carrying the cart as it is now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    pub kind: CartEventKind,
    pub snapshot: CartSnapshot,
    pub at: DateTime<Utc>,
}

// =============================================================================
// Cart Store
// =============================================================================

/// Handle to the cart of one checkout session.
///
/// Cloning the handle shares the same cart and event channel.
///
/// ## Stricter Than the Engine
/// [`CartEngine`] accepts any input. The store checks cashier input first
/// and returns an error without touching the cart when it is refused:
/// - `add_item`: the product id must not be blank
/// - `set_quantity`: at most `MAX_ITEM_QUANTITY` (999); zero or less still
///   removes the line
/// - `set_discount`: percentage at most 100%, flat amount not negative
/// - `set_note`: at most the configured `max_note_length` characters
///
/// Hosts that need the engine's permissive behaviour can use
/// [`CartEngine`] directly.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<Mutex<CartEngine>>,
    events: broadcast::Sender<CartEvent>,
    settings: Option<Arc<SettingsHub>>,
}

impl CartStore {
    /// Creates a store around an empty cart, using the default note limit.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(CART_CHANNEL_CAPACITY);
        CartStore {
            cart: Arc::new(Mutex::new(CartEngine::new())),
            events,
            settings: None,
        }
    }

    /// Creates a store whose limits follow the live terminal settings.
    pub fn with_settings(settings: Arc<SettingsHub>) -> Self {
        CartStore {
            settings: Some(settings),
            ..CartStore::new()
        }
    }

    /// Subscribes to cart events.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use tillpoint_session::CartStore;
    ///
    /// let store = CartStore::new();
    /// let subtotal = store.with_cart(|cart| cart.subtotal());
    /// assert!(subtotal.is_zero());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartEngine) -> R,
    {
        f(&self.lock())
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().snapshot()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product.
    pub fn add_item(&self, product: &ProductSnapshot) -> SessionResult<CartSnapshot> {
        validate_product_id(&product.id)?;
        debug!(product_id = %product.id, "add_item");

        Ok(self.mutate(|cart| {
            let line_id = cart.add_item(product);
            Some(CartEventKind::ItemAdded {
                line_id,
                product_id: product.id.clone(),
            })
        }))
    }

    /// Removes a line. Unknown ids are ignored and publish nothing.
    pub fn remove_item(&self, line_id: &str) -> CartSnapshot {
        debug!(line_id = %line_id, "remove_item");
        self.mutate(|cart| {
            cart.remove_item(line_id).then(|| CartEventKind::ItemRemoved {
                line_id: line_id.to_string(),
            })
        })
    }

    /// Sets a line's quantity; zero or below removes the line.
    ///
    /// Positive quantities above `MAX_ITEM_QUANTITY` are refused.
    pub fn set_quantity(&self, line_id: &str, quantity: i64) -> SessionResult<CartSnapshot> {
        debug!(line_id = %line_id, quantity, "set_quantity");
        if quantity <= 0 {
            return Ok(self.remove_item(line_id));
        }
        validate_quantity(quantity)?;

        Ok(self.mutate(|cart| {
            cart.set_quantity(line_id, quantity)
                .then(|| CartEventKind::QuantityChanged {
                    line_id: line_id.to_string(),
                    quantity,
                })
        }))
    }

    pub fn set_customer(&self, customer: Option<CustomerRef>) -> CartSnapshot {
        self.mutate(|cart| {
            cart.set_customer(customer);
            Some(CartEventKind::CustomerChanged)
        })
    }

    /// Applies a discount after checking it is 0-100% or a non-negative
    /// flat amount.
    pub fn set_discount(&self, discount: DiscountPolicy) -> SessionResult<CartSnapshot> {
        validate_discount(&discount)?;
        Ok(self.mutate(|cart| {
            cart.set_discount(discount);
            Some(CartEventKind::DiscountChanged)
        }))
    }

    /// Sets the order note, refusing notes over the configured length.
    pub fn set_note(&self, note: impl Into<String>) -> SessionResult<CartSnapshot> {
        let note = note.into();
        validate_note(&note, self.max_note_length())?;
        Ok(self.mutate(|cart| {
            cart.set_note(note);
            Some(CartEventKind::NoteChanged)
        }))
    }

    /// Resets the cart for the next checkout.
    pub fn clear(&self) -> CartSnapshot {
        debug!("clear");
        self.mutate(|cart| {
            cart.clear();
            Some(CartEventKind::Cleared)
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn max_note_length(&self) -> usize {
        self.settings
            .as_ref()
            .map(|hub| hub.read(|s| s.max_note_length))
            .unwrap_or(DEFAULT_MAX_NOTE_LENGTH)
    }

    /// Runs a mutation under the lock. The closure returns the event kind,
    /// or `None` if the cart did not change.
    fn mutate<F>(&self, f: F) -> CartSnapshot
    where
        F: FnOnce(&mut CartEngine) -> Option<CartEventKind>,
    {
        let mut cart = self.lock();
        let kind = f(&mut cart);
        let snapshot = cart.snapshot();

        if let Some(kind) = kind {
            // No subscribers is not an error
            let _ = self.events.send(CartEvent {
                kind,
                snapshot: snapshot.clone(),
                at: Utc::now(),
            });
        }

        snapshot
    }

    /// The engine never panics mid-mutation, so a poisoned lock still holds
    /// a consistent cart.
    fn lock(&self) -> MutexGuard<'_, CartEngine> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
