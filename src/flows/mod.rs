pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod listings;
pub mod profile;
pub mod purchases;
