//! Client handles for the catalog and order services.

#[macro_use]
mod macros;

pub mod catalog_client;
pub mod order_client;

pub use catalog_client::CatalogClient;
pub use order_client::OrderClient;
