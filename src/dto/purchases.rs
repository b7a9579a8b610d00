use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PaymentMethod, ShippingAddress};

/// Body for `POST /purchases/checkout`; the order contents come from the
/// caller's current cart on the server side.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

/// Body for `POST /purchases/single` (buy-now, bypassing the cart).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowRequest {
    pub product_id: Uuid,
    pub quantity: u32,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}
