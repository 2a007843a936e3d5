use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use super::{apply_patch, sort_newest_first, OrderPatch, OrderStore, StatusChange, StoreError};
use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::domain::{NewOrder, Order, OrderId, Products};

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = NewOrder;
    type Patch = OrderPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Stamps both timestamps with the store's clock.
    fn from_create_params(id: OrderId, params: NewOrder) -> Result<Self, String> {
        Ok(Order::from_new(id, params, Utc::now()))
    }

    fn on_update(&mut self, patch: OrderPatch) -> Result<(), String> {
        apply_patch(self, patch, Utc::now());
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

/// In-process order store backed by a [`ResourceActor`].
#[derive(Clone)]
pub struct MemoryStore {
    inner: ResourceClient<Order>,
}

impl MemoryStore {
    /// Spawns the backing actor; ids are `order_<n>`.
    pub fn spawn(buffer_size: usize) -> (Self, JoinHandle<()>) {
        Self::spawn_with(buffer_size, Vec::new())
    }

    /// Spawns the backing actor pre-loaded with existing orders.
    pub fn spawn_with(buffer_size: usize, orders: Vec<Order>) -> (Self, JoinHandle<()>) {
        let counter = Arc::new(AtomicU64::new(next_sequence(&orders)));
        let next_order_id = move || {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            OrderId::new(format!("order_{}", id))
        };
        let (actor, inner) = ResourceActor::with_entries(buffer_size, next_order_id, orders);
        let handle = tokio::spawn(actor.run());
        (Self { inner }, handle)
    }
}

/// One past the highest `order_<n>` among `orders`; other id shapes are ignored.
fn next_sequence(orders: &[Order]) -> u64 {
    orders
        .iter()
        .filter_map(|o| o.id.as_str().strip_prefix("order_"))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

#[async_trait]
impl OrderStore for MemoryStore {
    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        debug!("Sending request");
        let mut orders = self.inner.list().await?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    #[instrument(skip(self, order), fields(status = %order.status, cart = %order.cart_number))]
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        debug!("Sending request");
        Ok(self.inner.create(order).await?)
    }

    #[instrument(skip(self))]
    async fn set_order_status(&self, id: &OrderId, change: StatusChange) -> Result<Order, StoreError> {
        debug!("Sending request");
        Ok(self.inner.update(id.clone(), OrderPatch::Status(change)).await?)
    }

    #[instrument(skip(self, products))]
    async fn set_order_products(&self, id: &OrderId, products: Products) -> Result<Order, StoreError> {
        debug!("Sending request");
        Ok(self.inner.update(id.clone(), OrderPatch::Products(products)).await?)
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: &OrderId) -> Result<(), StoreError> {
        debug!("Sending request");
        Ok(self.inner.delete(id.clone()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CartNumber, OrderStatus};

    fn new_order(first: &str, status: OrderStatus) -> NewOrder {
        NewOrder {
            first_name: first.into(),
            last_name: "Smith".into(),
            products: Products::new(),
            cart_number: CartNumber::UNASSIGNED,
            status,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let (store, _handle) = MemoryStore::spawn(8);
        let first = store.create_order(new_order("Ann", OrderStatus::Waiting)).await.unwrap();
        let second = store.create_order(new_order("Bob", OrderStatus::Waiting)).await.unwrap();
        assert_eq!(first.id.as_str(), "order_1");
        assert_eq!(second.id.as_str(), "order_2");
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_status_change_and_delete() {
        let (store, _handle) = MemoryStore::spawn(8);
        let order = store.create_order(new_order("Ann", OrderStatus::Waiting)).await.unwrap();

        let archived = store
            .set_order_status(&order.id, StatusChange::to(OrderStatus::Archived))
            .await
            .unwrap();
        assert!(archived.archived_at.is_some());
        assert!(archived.updated_at >= archived.created_at);

        store.delete_order(&order.id).await.unwrap();
        assert!(store.list_orders().await.unwrap().is_empty());
        assert_eq!(
            store.delete_order(&order.id).await,
            Err(StoreError::NotFound(order.id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_seeded_store_continues_numbering() {
        let existing = Order::from_new("order_1".into(), new_order("Ann", OrderStatus::Waiting), Utc::now());
        let (store, _handle) = MemoryStore::spawn_with(8, vec![existing]);
        let created = store.create_order(new_order("Bob", OrderStatus::Waiting)).await.unwrap();
        assert_eq!(created.id.as_str(), "order_2");
        assert_eq!(store.list_orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_store_skips_past_highest_id() {
        let now = Utc::now();
        let seeded = vec![
            Order::from_new("order_2".into(), new_order("Seeded", OrderStatus::Waiting), now),
            Order::from_new("legacy".into(), new_order("Old", OrderStatus::Waiting), now),
        ];
        let (store, _handle) = MemoryStore::spawn_with(8, seeded);

        let created = store.create_order(new_order("Fresh", OrderStatus::Waiting)).await.unwrap();
        assert_eq!(created.id.as_str(), "order_3");

        let orders = store.list_orders().await.unwrap();
        assert_eq!(orders.len(), 3);
        let seeded = orders.iter().find(|o| o.id.as_str() == "order_2").unwrap();
        assert_eq!(seeded.first_name, "Seeded");
    }
}
