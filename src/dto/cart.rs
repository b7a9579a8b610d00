use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body for `POST /cart/add` and `PUT /cart/update`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Body for `DELETE /cart/remove`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartItemRequest {
    pub product_id: Uuid,
}
