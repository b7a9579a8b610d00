//! Cart engine: holds the authoritative-from-server cart snapshot and
//! issues mutations against it.
//!
//! Every successful mutation is followed by a full snapshot re-fetch, so
//! the displayed total can never drift from server state. Failures keep
//! the previous snapshot and surface a transient status message.

use std::sync::Arc;

use uuid::Uuid;

use crate::gateway::MarketGateway;
use crate::models::{Cart, format_usd};
use crate::prompt::ConfirmPrompt;

pub struct CartEngine<G> {
    gateway: Arc<G>,
    cart: Option<Cart>,
    message: Option<String>,
}

impl<G: MarketGateway> CartEngine<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            cart: None,
            message: None,
        }
    }

    /// Latest snapshot, if the initial fetch has succeeded at least once.
    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// Takes the transient status message, clearing it.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    /// Server-computed total of the current snapshot.
    pub fn total_amount(&self) -> f64 {
        self.cart.as_ref().map_or(0.0, |c| c.total_amount)
    }

    pub fn total_display(&self) -> String {
        format_usd(self.total_amount())
    }

    /// Fetch the snapshot. On failure the previous snapshot stays
    /// displayed; the first load degrades to an empty placeholder.
    pub async fn refresh(&mut self) {
        match self.gateway.fetch_cart().await {
            Ok(cart) => self.cart = Some(cart),
            Err(err) => {
                tracing::warn!(error = %err, "cart fetch failed");
                self.message = Some(err.user_message("Failed to load cart"));
            }
        }
    }

    /// Add a product; the server merges into an existing line item, so the
    /// cart never holds duplicate entries for one product.
    pub async fn add(&mut self, product_id: Uuid, quantity: u32) {
        if quantity < 1 {
            self.message = Some("Quantity must be at least 1".to_string());
            return;
        }
        match self.gateway.add_to_cart(product_id, quantity).await {
            Ok(()) => {
                // Re-fetch last: a failed re-fetch must win the message slot
                // so the user isn't told "added" over a stale snapshot.
                self.message = Some("Product added to cart!".to_string());
                self.refresh().await;
            }
            Err(err) => {
                self.message = Some(err.user_message("Failed to add to cart"));
            }
        }
    }

    /// Set an item's quantity. Values below 1 are suppressed client-side;
    /// no request is issued for them.
    pub async fn set_quantity(&mut self, product_id: Uuid, quantity: u32) {
        if quantity < 1 {
            return;
        }
        if self
            .cart
            .as_ref()
            .is_none_or(|cart| cart.item(product_id).is_none())
        {
            self.message = Some("Item is not in your cart".to_string());
            return;
        }

        match self.gateway.update_cart_item(product_id, quantity).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                self.message = Some(err.user_message("Failed to update cart"));
            }
        }
    }

    pub async fn increment(&mut self, product_id: Uuid) {
        let Some(current) = self.item_quantity(product_id) else {
            return;
        };
        self.set_quantity(product_id, current + 1).await;
    }

    /// Decrementing at quantity 1 is a no-op: the floor is enforced here,
    /// not by the server.
    pub async fn decrement(&mut self, product_id: Uuid) {
        let Some(current) = self.item_quantity(product_id) else {
            return;
        };
        if current <= 1 {
            return;
        }
        self.set_quantity(product_id, current - 1).await;
    }

    pub async fn remove(&mut self, product_id: Uuid) {
        match self.gateway.remove_cart_item(product_id).await {
            Ok(()) => {
                self.message = Some("Item removed from cart".to_string());
                self.refresh().await;
            }
            Err(err) => {
                self.message = Some(err.user_message("Failed to remove item"));
            }
        }
    }

    /// Empty the cart. Dispatches nothing unless the prompt answers yes.
    pub async fn clear(&mut self, prompt: &dyn ConfirmPrompt) {
        if !prompt.confirm("Are you sure you want to clear your cart?") {
            return;
        }
        match self.gateway.clear_cart().await {
            Ok(()) => {
                self.message = Some("Cart cleared".to_string());
                self.refresh().await;
            }
            Err(err) => {
                self.message = Some(err.user_message("Failed to clear cart"));
            }
        }
    }

    fn item_quantity(&self, product_id: Uuid) -> Option<u32> {
        self.cart
            .as_ref()
            .and_then(|cart| cart.item(product_id))
            .map(|item| item.quantity)
    }
}

/// Snapshot invariant: the server total must equal the sum of per-item
/// subtotals. Exposed for assertions and debug displays.
pub fn snapshot_consistent(cart: &Cart) -> bool {
    (cart.total_amount - cart.subtotals_sum()).abs() < 1e-9
}

impl<G> std::fmt::Debug for CartEngine<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("items", &self.cart.as_ref().map_or(0, |c| c.items.len()))
            .finish()
    }
}
