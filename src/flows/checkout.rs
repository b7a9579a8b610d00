//! Checkout / order placement flow.
//!
//! One state machine shape with two entry points: checkout of the whole
//! cart, and a single-product buy-now path that bypasses the cart. The
//! submit control is single-flight; a failed submission returns to the
//! open form with every entered field preserved.

use std::sync::Arc;
use std::time::Duration;

use crate::dto::purchases::{BuyNowRequest, CheckoutRequest};
use crate::error::ClientError;
use crate::forms::CheckoutForm;
use crate::gateway::MarketGateway;
use crate::models::{Product, format_usd};
use crate::session::Session;

/// How long the success message stays up before the client navigates to
/// the purchase history view.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(2000);

/// Largest quantity the buy-now selector offers, before clamping to the
/// product's available stock.
pub const MAX_BUY_NOW_QUANTITY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Browsing,
    FormOpen,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone)]
pub enum CheckoutSource {
    /// Multi-item checkout; the server derives the order from the
    /// caller's current cart, so only the displayed total is carried.
    Cart { total: f64 },
    /// Single product with a user-chosen quantity.
    BuyNow { product: Product, quantity: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    PurchaseHistory,
}

/// Navigation scheduled after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRedirect {
    pub target: RedirectTarget,
    pub delay: Duration,
}

pub struct CheckoutFlow<G> {
    gateway: Arc<G>,
    source: CheckoutSource,
    state: FlowState,
    pub form: CheckoutForm,
    message: Option<String>,
    redirect: Option<ScheduledRedirect>,
}

impl<G: MarketGateway> CheckoutFlow<G> {
    pub fn for_cart(gateway: Arc<G>, total: f64) -> Self {
        Self::new(gateway, CheckoutSource::Cart { total })
    }

    /// Buy-now entry point. The chosen quantity is clamped client-side to
    /// 1..=min(MAX_BUY_NOW_QUANTITY, available stock).
    pub fn buy_now(gateway: Arc<G>, product: Product, quantity: u32) -> Self {
        let ceiling = MAX_BUY_NOW_QUANTITY.min(product.quantity.max(1));
        let quantity = quantity.clamp(1, ceiling);
        Self::new(gateway, CheckoutSource::BuyNow { product, quantity })
    }

    fn new(gateway: Arc<G>, source: CheckoutSource) -> Self {
        Self {
            gateway,
            source,
            state: FlowState::Browsing,
            form: CheckoutForm::default(),
            message: None,
            redirect: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn source(&self) -> &CheckoutSource {
        &self.source
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn redirect(&self) -> Option<ScheduledRedirect> {
        self.redirect
    }

    /// Order total shown on the form. The cart path trusts the snapshot
    /// total taken at flow creation; the backend re-derives it anyway.
    pub fn order_total(&self) -> f64 {
        match &self.source {
            CheckoutSource::Cart { total } => *total,
            CheckoutSource::BuyNow { product, quantity } => {
                product.price * f64::from(*quantity)
            }
        }
    }

    pub fn order_total_display(&self) -> String {
        format_usd(self.order_total())
    }

    /// Open the form. Buy-now requires a signed-in session; the cart path
    /// is only reachable from already-authenticated views.
    pub fn open(&mut self, session: &Session) {
        if self.state != FlowState::Browsing {
            return;
        }
        if matches!(self.source, CheckoutSource::BuyNow { .. }) && !session.is_authenticated() {
            self.message = Some("Please sign in to complete a purchase".to_string());
            return;
        }
        self.state = FlowState::FormOpen;
    }

    /// Cancel is allowed any time before submission starts.
    pub fn cancel(&mut self) {
        if self.state == FlowState::FormOpen {
            self.state = FlowState::Browsing;
        }
    }

    /// Validate and submit. Nothing leaves the process unless every
    /// shipping field is present; while a submission is outstanding
    /// further submits are refused (single-flight per flow instance).
    pub async fn submit(&mut self) {
        if self.state == FlowState::Submitting {
            self.message = Some(ClientError::SubmissionInFlight.to_string());
            return;
        }
        if self.state != FlowState::FormOpen {
            return;
        }

        let shipping_address = match self.form.shipping.validate() {
            Ok(address) => address,
            Err(err) => {
                self.message = Some(err.to_string());
                return;
            }
        };

        self.state = FlowState::Submitting;
        let result = match &self.source {
            CheckoutSource::Cart { .. } => {
                let req = CheckoutRequest {
                    shipping_address,
                    payment_method: self.form.payment_method,
                };
                self.gateway.checkout_cart(&req).await
            }
            CheckoutSource::BuyNow { product, quantity } => {
                let req = BuyNowRequest {
                    product_id: product.id,
                    quantity: *quantity,
                    shipping_address,
                    payment_method: self.form.payment_method,
                };
                self.gateway.buy_now(&req).await
            }
        };

        match result {
            Ok(()) => {
                self.state = FlowState::Succeeded;
                self.message = Some(
                    "Purchase completed successfully! Redirecting to purchases...".to_string(),
                );
                self.redirect = Some(ScheduledRedirect {
                    target: RedirectTarget::PurchaseHistory,
                    delay: REDIRECT_DELAY,
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "checkout submission failed");
                // Back to the open form; entered values are untouched.
                self.state = FlowState::FormOpen;
                self.message = Some(err.user_message("Checkout failed"));
            }
        }
    }

    #[cfg(test)]
    fn force_state(&mut self, state: FlowState) {
        self.state = state;
    }
}

impl<G> std::fmt::Debug for CheckoutFlow<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("state", &self.state)
            .finish()
    }
}
