//! Purchase history: a read-only projection of completed orders.

use std::sync::Arc;

use crate::gateway::MarketGateway;
use crate::models::{Purchase, PurchaseStatus};

/// Badge text for a purchase status in the history view.
pub fn status_label(status: PurchaseStatus) -> &'static str {
    status.as_str()
}

pub struct PurchaseHistory<G> {
    gateway: Arc<G>,
    purchases: Vec<Purchase>,
}

impl<G: MarketGateway> PurchaseHistory<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            purchases: Vec::new(),
        }
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// Read failure degrades to an empty list rather than an error state.
    pub async fn load(&mut self) {
        match self.gateway.list_purchases().await {
            Ok(purchases) => self.purchases = purchases,
            Err(err) => {
                tracing::warn!(error = %err, "purchase history fetch failed");
                self.purchases.clear();
            }
        }
    }
}

impl<G> std::fmt::Debug for PurchaseHistory<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PurchaseHistory")
            .field("purchases", &self.purchases.len())
            .finish()
    }
}
