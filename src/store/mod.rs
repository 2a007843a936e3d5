//! The order record store collaborator.
//!
//! The lifecycle engine only talks to [`OrderStore`]; the store owns ids and
//! server-side timestamps. Two implementations ship with the crate: an
//! actor-backed [`MemoryStore`] and a single-document [`JsonFileStore`].

pub mod error;
pub mod json_file;
pub mod memory;
pub mod patch;

use async_trait::async_trait;

use crate::domain::{NewOrder, Order, OrderId, Products};

pub use error::*;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use patch::*;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Every stored order, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Persists a new order, assigning its id and timestamps.
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    /// Changes status (and cart, when given). Stamps `archivedAt` when the
    /// new status is archived.
    async fn set_order_status(&self, id: &OrderId, change: StatusChange) -> Result<Order, StoreError>;

    async fn set_order_products(&self, id: &OrderId, products: Products) -> Result<Order, StoreError>;

    async fn delete_order(&self, id: &OrderId) -> Result<(), StoreError>;
}

/// Newest first; ties broken by id so listings are stable.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}
