pub mod cart;
pub mod products;
pub mod purchases;
pub mod upload;
pub mod users;
