//! Shared form-state structs with client-side validation.
//!
//! Each form is an explicit struct with a fixed field set; validation
//! runs before any request is issued and produces the typed wire
//! payload on success.

use crate::dto::products::{NewProductRequest, UpdateProductRequest};
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, Condition, PaymentMethod, Product, ShippingAddress};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddressForm {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ShippingAddressForm {
    /// All five fields are required; fails on the first missing one.
    pub fn validate(&self) -> ClientResult<ShippingAddress> {
        let fields = [
            ("street address", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("ZIP code", &self.zip_code),
            ("country", &self.country),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(ClientError::Validation(format!("Missing {label}")));
            }
        }
        Ok(ShippingAddress {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: self.country.trim().to_string(),
        })
    }
}

/// Input collected by the checkout and buy-now forms. Not persisted
/// beyond the active checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub shipping: ShippingAddressForm,
    pub payment_method: PaymentMethod,
}

/// Listing create/edit form. Numeric fields are kept as entered text and
/// parsed on validation, so a half-typed value never corrupts state.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub price: String,
    pub condition: Option<Condition>,
    pub location: String,
    pub quantity: String,
}

impl ListingForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            category: Some(product.category),
            price: product.price.to_string(),
            condition: Some(product.condition),
            location: product.location.clone(),
            quantity: product.quantity.to_string(),
        }
    }

    /// Editable-subset payload for `PUT /products/{id}`.
    pub fn validate(&self) -> ClientResult<UpdateProductRequest> {
        if self.title.trim().is_empty() {
            return Err(ClientError::Validation("Missing title".to_string()));
        }
        let category = self
            .category
            .ok_or_else(|| ClientError::Validation("Missing category".to_string()))?;
        let condition = self
            .condition
            .ok_or_else(|| ClientError::Validation("Missing condition".to_string()))?;
        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| ClientError::Validation("Price must be a number".to_string()))?;
        if price < 0.0 {
            return Err(ClientError::Validation(
                "Price must not be negative".to_string(),
            ));
        }
        let quantity: u32 = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| ClientError::Validation("Quantity must be a whole number".to_string()))?;
        if quantity < 1 {
            return Err(ClientError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }
        Ok(UpdateProductRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category,
            price,
            condition,
            location: self.location.trim().to_string(),
            quantity,
        })
    }

    /// Full payload for `POST /products`; new listings need at least one
    /// image.
    pub fn validate_new(&self, images: Vec<String>) -> ClientResult<NewProductRequest> {
        let base = self.validate()?;
        if images.is_empty() {
            return Err(ClientError::Validation(
                "Please add at least one image".to_string(),
            ));
        }
        Ok(NewProductRequest {
            title: base.title,
            description: base.description,
            category: base.category,
            price: base.price,
            condition: base.condition,
            location: base.location,
            quantity: base.quantity,
            images,
        })
    }
}
