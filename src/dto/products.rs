use serde::{Deserialize, Serialize};

use crate::models::{Category, Condition, Product};

/// Category filter with an "All" sentinel meaning no category constraint.
/// Only `Only` values ever reach the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    /// Accepts the 10 category names plus the "All" sentinel.
    pub fn parse(value: &str) -> Option<CategoryFilter> {
        if value == "All" {
            return Some(CategoryFilter::All);
        }
        Category::parse(value).map(CategoryFilter::Only)
    }
}

/// Query parameters for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: String,
    pub category: CategoryFilter,
}

#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

/// Body for `POST /products`.
#[derive(Debug, Serialize, Clone)]
pub struct NewProductRequest {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    pub condition: Condition,
    pub location: String,
    pub quantity: u32,
    pub images: Vec<String>,
}

/// Body for `PUT /products/{id}`: only the seller-editable subset.
#[derive(Debug, Serialize, Clone)]
pub struct UpdateProductRequest {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    pub condition: Condition,
    pub location: String,
    pub quantity: u32,
}
