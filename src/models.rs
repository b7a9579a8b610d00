use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of product categories accepted by the API.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Electronics,
    Clothing,
    Furniture,
    Books,
    Sports,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    Toys,
    Beauty,
    Automotive,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Electronics,
        Category::Clothing,
        Category::Furniture,
        Category::Books,
        Category::Sports,
        Category::HomeAndGarden,
        Category::Toys,
        Category::Beauty,
        Category::Automotive,
        Category::Other,
    ];

    /// Wire name, also used for display and query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Furniture => "Furniture",
            Category::Books => "Books",
            Category::Sports => "Sports",
            Category::HomeAndGarden => "Home & Garden",
            Category::Toys => "Toys",
            Category::Beauty => "Beauty",
            Category::Automotive => "Automotive",
            Category::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        }
    }

    pub fn parse(value: &str) -> Option<Condition> {
        Condition::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    PayPal,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::PayPal,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<PaymentMethod> {
        PaymentMethod::ALL.iter().copied().find(|m| m.as_str() == value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Cancelled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "Pending",
            PurchaseStatus::Completed => "Completed",
            PurchaseStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SellerRef {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    pub condition: Condition,
    pub location: String,
    pub quantity: u32,
    pub images: Vec<String>,
    pub is_available: bool,
    pub seller: SellerRef,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Server-authoritative cart snapshot. The client never recomputes
/// `total_amount`; it re-fetches instead.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub user: Uuid,
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub last_updated: DateTime<Utc>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, product_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Sum of per-item subtotals, for checking the snapshot invariant
    /// `total_amount == Σ price × quantity`.
    pub fn subtotals_sum(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Product fields denormalized into a purchase at checkout time,
/// decoupled from the live listing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub images: Vec<String>,
    pub category: Category,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub buyer: Uuid,
    pub seller: SellerRef,
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub total_amount: f64,
    pub purchase_date: DateTime<Utc>,
    pub status: PurchaseStatus,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub bio: String,
    pub location: String,
    pub phone: String,
    pub date_joined: DateTime<Utc>,
}

/// Dollar display used across the cart and checkout views.
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}
