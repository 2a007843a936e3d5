use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{apply_patch, sort_newest_first, OrderPatch, OrderStore, StatusChange, StoreError};
use crate::domain::{NewOrder, Order, OrderId, Products};

/// On-disk shape of the store: one document holding every order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OrdersDocument {
    #[serde(default)]
    orders: Vec<Order>,
}

/// Order store persisted as a single JSON document.
///
/// Every mutation is applied to a copy, written to `<path>.tmp` and renamed
/// over the document; the in-memory copy only changes once the write lands.
pub struct JsonFileStore {
    path: PathBuf,
    orders: Mutex<BTreeMap<OrderId, Order>>,
}

impl JsonFileStore {
    /// Opens the document at `path`. A missing file is an empty store.
    #[instrument(skip(path), fields(document = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<OrdersDocument>(&bytes)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No order document yet, starting empty");
                OrdersDocument::default()
            }
            Err(e) => return Err(StoreError::Unavailable(e.to_string())),
        };

        let orders: BTreeMap<OrderId, Order> = document
            .orders
            .into_iter()
            .map(|order| (order.id.clone(), order))
            .collect();
        info!(count = orders.len(), "Order document loaded");

        Ok(Self { path, orders: Mutex::new(orders) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, orders: &BTreeMap<OrderId, Order>) -> Result<(), StoreError> {
        let document = OrdersDocument { orders: orders.values().cloned().collect() };
        let bytes = serde_json::to_vec_pretty(&document).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            warn!(error = %e, "Failed to write order document");
            StoreError::Unavailable(e.to_string())
        })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        debug!(count = orders.len(), "Order document written");
        Ok(())
    }

    async fn patch(&self, id: &OrderId, patch: OrderPatch) -> Result<Order, StoreError> {
        let mut orders = self.orders.lock().await;
        let mut next = orders.clone();
        let order = next
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_patch(order, patch, Utc::now());
        let updated = order.clone();

        self.persist(&next).await?;
        *orders = next;
        Ok(updated)
    }
}

#[async_trait]
impl OrderStore for JsonFileStore {
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self.orders.lock().await.values().cloned().collect();
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    #[instrument(skip(self, order), fields(status = %order.status))]
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let id = OrderId::new(Uuid::new_v4().simple().to_string());
        let created = Order::from_new(id.clone(), order, Utc::now());

        let mut orders = self.orders.lock().await;
        let mut next = orders.clone();
        next.insert(id, created.clone());
        self.persist(&next).await?;
        *orders = next;

        info!(order_id = %created.id, "Order stored");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn set_order_status(&self, id: &OrderId, change: StatusChange) -> Result<Order, StoreError> {
        self.patch(id, OrderPatch::Status(change)).await
    }

    #[instrument(skip(self, products))]
    async fn set_order_products(&self, id: &OrderId, products: Products) -> Result<Order, StoreError> {
        self.patch(id, OrderPatch::Products(products)).await
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: &OrderId) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().await;
        let mut next = orders.clone();
        if next.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.persist(&next).await?;
        *orders = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CartNumber, OrderStatus};

    fn new_order(cart: u8, status: OrderStatus) -> NewOrder {
        NewOrder {
            first_name: "Ida".into(),
            last_name: "Wells".into(),
            products: Products::new(),
            cart_number: CartNumber::new(cart).unwrap(),
            status,
        }
    }

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("orders.json")).await.unwrap();
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        let created = store.create_order(new_order(2, OrderStatus::Open)).await.unwrap();
        store
            .set_order_status(&created.id, StatusChange::to(OrderStatus::Completed))
            .await
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let orders = reopened.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, created.id);
        assert_eq!(orders[0].status, OrderStatus::Completed);
        assert_eq!(orders[0].cart_number.get(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path).await, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("orders.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        let result = store.create_order(new_order(0, OrderStatus::Waiting)).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("orders.json")).await.unwrap();
        assert_eq!(
            store.delete_order(&OrderId::from("nope")).await,
            Err(StoreError::NotFound("nope".into()))
        );
    }
}
