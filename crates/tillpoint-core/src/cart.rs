//! # Cart Engine
//!
//! The in-memory cart behind one POS checkout session.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                               │
//! │                                                                         │
//! │  Terminal Action          Engine Call             State Change          │
//! │  ───────────────          ───────────             ────────────          │
//! │                                                                         │
//! │  Scan / click product ──► add_item() ───────────► push line or qty += 1│
//! │                                                                         │
//! │  Type quantity ─────────► set_quantity() ───────► qty = n (n <= 0: drop)│
//! │                                                                         │
//! │  Click remove ──────────► remove_item() ────────► line dropped         │
//! │                                                                         │
//! │  Pick customer ─────────► set_customer() ───────► customer = Some/None │
//! │  Apply discount ────────► set_discount() ───────► discount = policy    │
//! │  Type note ─────────────► set_note() ───────────► note = text          │
//! │                                                                         │
//! │  Checkout done ─────────► clear() ──────────────► everything reset     │
//! │                                                                         │
//! │  Render ────────────────► snapshot() ───────────► (read only, derived) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! Nothing monetary is stored except each line's captured unit price.
//! Subtotal, discount amount and total are recomputed on every read, so
//! there is no cache to invalidate.
//!
//! Every operation is total: unknown line ids are ignored, missing prices
//! ring up at zero, and an oversized discount clamps the total at zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{CustomerRef, DiscountPolicy, ProductSnapshot};

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in the cart.
///
/// ## Price Freezing
/// `unit_price` is captured from the product snapshot when the line is
/// created and never re-derived. Re-adding the same product with a different
/// price only bumps the quantity; the first-seen price wins for the rest of
/// the session. Re-capturing would silently change the total of lines the
/// cashier has already rung up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Session-local line id (UUID v4).
    pub id: String,

    /// The product as it was first added.
    pub product: ProductSnapshot,

    /// Always >= 1.
    pub quantity: i64,

    /// Price captured at insertion.
    pub unit_price: Money,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    fn from_product(product: &ProductSnapshot) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            product: product.clone(),
            quantity: 1,
            unit_price: product.unit_price(),
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// The read-only view handed to rendering code.
///
/// ## Serialization
/// ```json
/// {
///   "items": [{ "id": "…", "product": { "id": "1" }, "quantity": 2, "unitPrice": 1000 }],
///   "customer": null,
///   "discount": { "kind": "percentage", "value": 0 },
///   "note": "",
///   "itemCount": 1,
///   "totalQuantity": 2,
///   "subtotal": 2000,
///   "discountAmount": 0,
///   "total": 2000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub customer: Option<CustomerRef>,
    pub discount: DiscountPolicy,
    pub note: String,
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
}

impl CartSnapshot {
    /// Returns true if the snapshot has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Cart Engine
// =============================================================================

/// The cart for one checkout session.
///
/// ## Invariants
/// - Lines are unique by `product.id` (re-adding increases quantity)
/// - Every line has quantity >= 1 (non-positive quantities remove the line)
/// - `total()` is never negative
/// - `clear()` resets items, customer, discount and note together
///
/// Lines keep insertion order; the order matters for display only.
#[derive(Debug, Clone)]
pub struct CartEngine {
    items: Vec<LineItem>,
    customer: Option<CustomerRef>,
    discount: DiscountPolicy,
    note: String,
}

impl CartEngine {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        CartEngine {
            items: Vec::new(),
            customer: None,
            discount: DiscountPolicy::default(),
            note: String::new(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product and returns the id of the affected line.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity += 1, captured price untouched
    /// - Product not in cart: new line with quantity 1 and the snapshot's
    ///   `unit_price()` (selling price, else price, else zero)
    pub fn add_item(&mut self, product: &ProductSnapshot) -> String {
        if let Some(line) = self.items.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            debug!(
                line_id = %line.id,
                product_id = %product.id,
                quantity = line.quantity,
                "Incremented cart line"
            );
            return line.id.clone();
        }

        let line = LineItem::from_product(product);
        debug!(
            line_id = %line.id,
            product_id = %product.id,
            unit_price = line.unit_price.cents(),
            "Added cart line"
        );
        let id = line.id.clone();
        self.items.push(line);
        id
    }

    /// Removes a line. Returns false (and changes nothing) if the id is
    /// unknown, so a double-clicked remove button is harmless.
    pub fn remove_item(&mut self, line_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.id != line_id);
        let removed = self.items.len() != before;
        debug!(line_id = %line_id, removed, "Remove cart line");
        removed
    }

    /// Sets a line's quantity.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: identical to [`CartEngine::remove_item`], so the
    ///   quantity box doubles as a remove control
    /// - line exists: quantity replaced
    /// - line unknown: no-op
    ///
    /// Returns true if the cart changed.
    pub fn set_quantity(&mut self, line_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(line_id);
        }

        match self.items.iter_mut().find(|l| l.id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                debug!(line_id = %line_id, quantity, "Set cart line quantity");
                true
            }
            None => {
                debug!(line_id = %line_id, "Quantity change for unknown line ignored");
                false
            }
        }
    }

    /// Resets items, customer, discount and note in one step.
    pub fn clear(&mut self) {
        *self = CartEngine::new();
        debug!("Cart cleared");
    }

    pub fn set_customer(&mut self, customer: Option<CustomerRef>) {
        debug!(customer_id = ?customer.as_ref().map(|c| c.id.as_str()), "Set cart customer");
        self.customer = customer;
    }

    /// Replaces the discount policy. Range checks belong to the caller; see
    /// [`crate::validation::validate_discount`].
    pub fn set_discount(&mut self, discount: DiscountPolicy) {
        debug!(?discount, "Set cart discount");
        self.discount = discount;
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a line by id.
    pub fn line(&self, line_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|l| l.id == line_id)
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn discount(&self) -> DiscountPolicy {
        self.discount
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ(unit_price × quantity).
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Discount the current policy yields on the current subtotal.
    pub fn discount_amount(&self) -> Money {
        self.discount.amount_for(self.subtotal())
    }

    /// max(0, subtotal − discount_amount).
    pub fn total(&self) -> Money {
        let subtotal = self.subtotal();
        (subtotal - self.discount.amount_for(subtotal)).non_negative()
    }

    /// Builds the derived read model.
    pub fn snapshot(&self) -> CartSnapshot {
        let subtotal = self.subtotal();
        let discount_amount = self.discount.amount_for(subtotal);

        CartSnapshot {
            items: self.items.clone(),
            customer: self.customer.clone(),
            discount: self.discount,
            note: self.note.clone(),
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal,
            discount_amount,
            total: (subtotal - discount_amount).non_negative(),
        }
    }
}

impl Default for CartEngine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn selling(id: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot::with_selling_price(id, Money::from_cents(cents))
    }

    fn listed(id: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot::with_price(id, Money::from_cents(cents))
    }

    fn quantities(cart: &CartEngine) -> Vec<(String, i64)> {
        cart.items()
            .iter()
            .map(|l| (l.product.id.clone(), l.quantity))
            .collect()
    }

    #[test]
    fn test_new_cart_is_empty() {
        let snapshot = CartEngine::new().snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.customer, None);
        assert_eq!(snapshot.discount, DiscountPolicy::percentage(0));
        assert_eq!(snapshot.note, "");
        assert!(snapshot.subtotal.is_zero());
        assert!(snapshot.total.is_zero());
    }

    #[test]
    fn test_scenario_mixed_price_fields() {
        let mut cart = CartEngine::new();
        cart.add_item(&selling("1", 1000));
        cart.add_item(&listed("2", 500));
        cart.add_item(&selling("1", 1000));

        let snapshot = cart.snapshot();
        let lines: Vec<(&str, i64, i64)> = snapshot
            .items
            .iter()
            .map(|l| (l.product.id.as_str(), l.quantity, l.unit_price.cents()))
            .collect();
        assert_eq!(lines, vec![("1", 2, 1000), ("2", 1, 500)]);
        assert_eq!(snapshot.subtotal.cents(), 2500);
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.total_quantity, 3);
    }

    #[test]
    fn test_distinct_products_get_one_line_each() {
        let mut cart = CartEngine::new();
        let adds = ["a", "b", "a", "c", "b", "a", "d"];
        for id in adds {
            cart.add_item(&selling(id, 100));
        }

        assert_eq!(cart.item_count(), 4);
        assert_eq!(
            quantities(&cart),
            vec![
                ("a".to_string(), 3),
                ("b".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_readding_keeps_first_captured_price() {
        let mut cart = CartEngine::new();
        let first = cart.add_item(&selling("1", 1000));
        let second = cart.add_item(&selling("1", 1500));

        assert_eq!(first, second);
        let line = cart.line(&first).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price.cents(), 1000);
        assert_eq!(cart.subtotal().cents(), 2000);
    }

    #[test]
    fn test_product_without_price_rings_up_free() {
        let mut cart = CartEngine::new();
        cart.add_item(&ProductSnapshot::new("gift-wrap"));
        assert_eq!(cart.item_count(), 1);
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_remove_item() {
        let mut cart = CartEngine::new();
        let keep = cart.add_item(&selling("1", 100));
        let drop = cart.add_item(&selling("2", 200));

        assert!(cart.remove_item(&drop));
        assert_eq!(cart.item_count(), 1);
        assert!(cart.line(&keep).is_some());

        // Second click on the same remove button
        assert!(!cart.remove_item(&drop));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_set_quantity_zero_matches_remove() {
        let build = || {
            let mut cart = CartEngine::new();
            let a = cart.add_item(&selling("1", 100));
            cart.add_item(&selling("2", 200));
            cart.add_item(&selling("3", 300));
            (cart, a)
        };

        let (mut via_quantity, a1) = build();
        let (mut via_remove, a2) = build();
        via_quantity.set_quantity(&a1, 0);
        via_remove.remove_item(&a2);

        assert_eq!(quantities(&via_quantity), quantities(&via_remove));
        assert_eq!(via_quantity.subtotal(), via_remove.subtotal());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let mut cart = CartEngine::new();
        let id = cart.add_item(&selling("1", 100));
        assert!(cart.set_quantity(&id, -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = CartEngine::new();
        let id = cart.add_item(&selling("1", 250));
        assert!(cart.set_quantity(&id, 4));
        assert_eq!(cart.line(&id).unwrap().quantity, 4);
        assert_eq!(cart.subtotal().cents(), 1000);
    }

    #[test]
    fn test_set_quantity_unknown_line_is_noop() {
        let mut cart = CartEngine::new();
        cart.add_item(&selling("1", 250));
        assert!(!cart.set_quantity("missing", 7));
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_percentage_then_flat_discount() {
        let mut cart = CartEngine::new();
        let id = cart.add_item(&selling("1", 10000));
        assert_eq!(cart.line(&id).unwrap().line_total().cents(), 10000);

        cart.set_discount(DiscountPolicy::percentage(2000));
        let snapshot = cart.snapshot();
        assert_eq!(snapshot.discount_amount.cents(), 2000);
        assert_eq!(snapshot.total.cents(), 8000);

        cart.set_discount(DiscountPolicy::flat(Money::from_cents(15000)));
        let snapshot = cart.snapshot();
        assert_eq!(snapshot.discount_amount.cents(), 15000);
        assert_eq!(snapshot.total.cents(), 0);
    }

    #[test]
    fn test_total_never_negative() {
        let discounts = [
            DiscountPolicy::percentage(0),
            DiscountPolicy::percentage(5000),
            DiscountPolicy::percentage(10000),
            DiscountPolicy::percentage(25000),
            DiscountPolicy::flat(Money::from_cents(-500)),
            DiscountPolicy::flat(Money::from_cents(1)),
            DiscountPolicy::flat(Money::from_cents(1_000_000)),
        ];

        for subtotal in [0_i64, 1, 999, 10000] {
            for discount in discounts {
                let mut cart = CartEngine::new();
                if subtotal > 0 {
                    cart.add_item(&selling("x", subtotal));
                }
                cart.set_discount(discount);

                let snapshot = cart.snapshot();
                assert!(!snapshot.total.is_negative(), "{discount:?} on {subtotal}");
                assert!(!snapshot.discount_amount.is_negative());
                assert_eq!(
                    snapshot.total,
                    (snapshot.subtotal - snapshot.discount_amount).non_negative()
                );
                assert_eq!(cart.total(), snapshot.total);
            }
        }
    }

    #[test]
    fn test_huge_quantity_saturates_instead_of_panicking() {
        let mut cart = CartEngine::new();
        let id = cart.add_item(&selling("1", 1000));
        cart.add_item(&selling("2", 1));
        assert!(cart.set_quantity(&id, i64::MAX / 100));

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.subtotal.cents(), i64::MAX);
        assert!(!snapshot.total.is_negative());
        assert_eq!(snapshot.total, snapshot.subtotal);
        assert_eq!(snapshot.total_quantity, i64::MAX / 100 + 1);

        cart.set_discount(DiscountPolicy::percentage(u32::MAX));
        let snapshot = cart.snapshot();
        assert_eq!(snapshot.discount_amount.cents(), i64::MAX);
        assert!(snapshot.total.is_zero());
    }

    #[test]
    fn test_readding_at_max_quantity_stays_positive() {
        let mut cart = CartEngine::new();
        let id = cart.add_item(&selling("1", 0));
        cart.set_quantity(&id, i64::MAX);
        cart.add_item(&selling("1", 0));
        assert_eq!(cart.line(&id).unwrap().quantity, i64::MAX);
        assert_eq!(cart.total_quantity(), i64::MAX);
    }

    #[test]
    fn test_negative_flat_discount_floors_to_zero() {
        let mut cart = CartEngine::new();
        cart.add_item(&selling("1", 1000));
        cart.set_discount(DiscountPolicy::flat(Money::from_cents(-500)));
        assert!(cart.discount_amount().is_zero());
        assert_eq!(cart.total().cents(), 1000);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = CartEngine::new();
        cart.add_item(&selling("1", 1000));
        cart.set_customer(Some(CustomerRef::new("c-1", "Dana")));
        cart.set_discount(DiscountPolicy::flat(Money::from_cents(100)));
        cart.set_note("gift receipt");

        cart.clear();

        let snapshot = cart.snapshot();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.customer, None);
        assert_eq!(snapshot.discount, DiscountPolicy::percentage(0));
        assert_eq!(snapshot.note, "");
        assert!(snapshot.total.is_zero());
    }

    #[test]
    fn test_setters() {
        let mut cart = CartEngine::new();
        cart.set_customer(Some(CustomerRef::new("c-9", "Sam")));
        cart.set_note("leave at desk");
        assert_eq!(cart.customer().map(|c| c.id.as_str()), Some("c-9"));
        assert_eq!(cart.note(), "leave at desk");

        cart.set_customer(None);
        assert!(cart.customer().is_none());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut cart = CartEngine::new();
        cart.add_item(&selling("1", 1000));
        let json = serde_json::to_value(cart.snapshot()).unwrap();

        assert_eq!(json["subtotal"], 1000);
        assert_eq!(json["discountAmount"], 0);
        assert_eq!(json["itemCount"], 1);
        assert_eq!(json["items"][0]["unitPrice"], 1000);
        assert_eq!(json["discount"]["kind"], "percentage");
    }
}
