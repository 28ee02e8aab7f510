//! Cart line items.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A (product, quantity) pairing the user intends to purchase.
///
/// A cart holds at most one line per product ID; the client state store
/// enforces that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Create a line item.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// ID of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity. `None` for unpriced products or on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.product.price?.checked_mul(self.quantity)
    }
}
