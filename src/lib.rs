//! Client for a second-hand marketplace REST API: typed models, an HTTP
//! gateway, and the stateful flows behind the cart, checkout, catalog,
//! listing, and purchase-history views.

pub mod config;
pub mod dto;
pub mod error;
pub mod flows;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod prompt;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{HttpGateway, MarketGateway};
pub use session::Session;
