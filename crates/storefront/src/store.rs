//! Client state store.
//!
//! The single authoritative, observable in-memory state for a browsing
//! session: the catalog snapshot, the active search query, the cart and the
//! fetch flags. Views hold a [`Store`] handle (no global singleton) and go
//! through its narrow mutation API for every write.
//!
//! Every mutation is applied atomically on a `tokio::sync::watch` channel
//! and is visible to all subscribers as soon as the call returns. There is
//! no batching or debouncing. The store never fails: it only records
//! failures reported by callers.

use std::sync::Arc;

use fashion_store_core::{CartItem, Price, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Snapshot of the whole client state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Current catalog, in the order the backend returned it.
    pub products: Vec<Product>,
    /// Active search query, stored verbatim.
    pub query: String,
    /// Cart lines in insertion order, at most one per product ID.
    pub cart: Vec<CartItem>,
    /// True while the current fetch is outstanding.
    pub loading: bool,
    /// Message from the last failed fetch, cleared when a fetch starts.
    pub error: Option<String>,
}

impl StoreState {
    /// Total number of units in the cart.
    #[must_use]
    pub fn cart_item_count(&self) -> u64 {
        self.cart.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals. Unpriced lines and overflowing totals are skipped.
    #[must_use]
    pub fn cart_subtotal(&self) -> Price {
        self.cart.iter().filter_map(CartItem::line_total).sum()
    }
}

/// Handle to the client state store.
///
/// Cheaply cloneable; clones refer to the same state.
#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<StoreState>>,
}

impl Store {
    /// Create a store in its initial (empty) state.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Subscribe to state changes.
    ///
    /// The receiver is marked changed after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Run a closure against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Clone of the full current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read(|s| s.products.clone())
    }

    #[must_use]
    pub fn query(&self) -> String {
        self.read(|s| s.query.clone())
    }

    #[must_use]
    pub fn cart(&self) -> Vec<CartItem> {
        self.read(|s| s.cart.clone())
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.read(|s| s.loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    #[must_use]
    pub fn cart_item_count(&self) -> u64 {
        self.read(StoreState::cart_item_count)
    }

    #[must_use]
    pub fn cart_subtotal(&self) -> Price {
        self.read(StoreState::cart_subtotal)
    }

    // =========================================================================
    // Catalog mutations
    // =========================================================================

    /// Replace the catalog wholesale.
    pub fn set_products(&self, products: Vec<Product>) {
        self.state.send_modify(|s| s.products = products);
    }

    /// Replace the active query. The string is stored as given.
    ///
    /// Re-fetching on query changes is the job of an observer, see
    /// [`CatalogFetcher::bind_query`](crate::fetch::CatalogFetcher::bind_query).
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_modify(|s| s.query = query);
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.send_modify(|s| s.error = error);
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add `quantity` units of a product.
    ///
    /// If the product is already in the cart its line quantity is increased
    /// (saturating) and the existing line keeps its position; otherwise a
    /// new line is appended. A zero quantity is ignored.
    pub fn add_to_cart(&self, product: Product, quantity: u32) {
        if quantity == 0 {
            warn!(product_id = %product.id, "Ignoring add to cart with zero quantity");
            return;
        }

        self.state.send_modify(|s| {
            if let Some(item) = s.cart.iter_mut().find(|item| item.product.id == product.id) {
                item.quantity = item.quantity.saturating_add(quantity);
            } else {
                s.cart.push(CartItem::new(product, quantity));
            }
        });
    }

    /// Remove the line for a product. Unknown IDs are a no-op.
    pub fn remove_from_cart(&self, product_id: ProductId) {
        self.state.send_if_modified(|s| {
            let before = s.cart.len();
            s.cart.retain(|item| item.product.id != product_id);
            before != s.cart.len()
        });
    }

    /// Set a line's quantity. Zero removes the line; unknown IDs are a no-op.
    pub fn set_quantity(&self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_from_cart(product_id);
            return;
        }

        let updated = self.state.send_if_modified(|s| {
            s.cart
                .iter_mut()
                .find(|item| item.product.id == product_id)
                .is_some_and(|item| {
                    item.quantity = quantity;
                    true
                })
        });

        if !updated {
            debug!(product_id = %product_id, "Quantity update for product not in cart");
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.state.send_modify(|s| s.cart.clear());
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.borrow())
            .finish()
    }
}
