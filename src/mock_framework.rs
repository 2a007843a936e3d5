//! # Mock Framework
//!
//! Utilities for testing clients and the lifecycle service in isolation.
//!
//! Use [`create_mock_client`] or [`create_mock_order_client`] to get a client
//! and the receiving end of its mailbox, then answer requests by hand with the
//! `expect_*` helpers. [`FailingStore`] wraps a real [`MemoryStore`] and fails
//! the calls a test chooses.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::clients::OrderClient;
use crate::domain::{NewOrder, Order, OrderId, Products};
use crate::messages::OrderRequest;
use crate::store::{MemoryStore, OrderStore, StatusChange, StoreError};

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client talks to a channel the test controls instead of a running
/// `ResourceActor`, so replies (success, failure, silence) are deterministic.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Same idea for the lifecycle service: an [`OrderClient`] with no service behind it.
pub fn create_mock_order_client(timeout: Duration) -> (OrderClient, mpsc::Receiver<OrderRequest>) {
    let (sender, receiver) = mpsc::channel(8);
    (OrderClient::new(sender, timeout), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Store operations a [`FailingStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    SetStatus,
    SetProducts,
    Delete,
}

/// A [`MemoryStore`] that reports `Unavailable` for chosen operations or orders.
pub struct FailingStore {
    inner: MemoryStore,
    failing_ops: Mutex<HashSet<StoreOp>>,
    failing_ids: Mutex<HashSet<OrderId>>,
    calls: Mutex<Vec<StoreOp>>,
    offline: AtomicBool,
}

impl FailingStore {
    pub fn spawn(orders: Vec<Order>) -> (Self, JoinHandle<()>) {
        let (inner, handle) = MemoryStore::spawn_with(16, orders);
        let store = Self {
            inner,
            failing_ops: Mutex::new(HashSet::new()),
            failing_ids: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        };
        (store, handle)
    }

    pub fn fail_op(&self, op: StoreOp) {
        self.failing_ops.lock().unwrap().insert(op);
    }

    pub fn fail_order(&self, id: impl Into<OrderId>) {
        self.failing_ids.lock().unwrap().insert(id.into());
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every operation attempted so far, failed or not.
    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, op: StoreOp, id: Option<&OrderId>) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        if self.failing_ops.lock().unwrap().contains(&op) {
            return Err(StoreError::Unavailable(format!("{:?} failed", op)));
        }
        if let Some(id) = id {
            if self.failing_ids.lock().unwrap().contains(id) {
                return Err(StoreError::Unavailable(format!("write to {} failed", id)));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for FailingStore {
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.check(StoreOp::List, None)?;
        self.inner.list_orders().await
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        self.check(StoreOp::Create, None)?;
        self.inner.create_order(order).await
    }

    async fn set_order_status(&self, id: &OrderId, change: StatusChange) -> Result<Order, StoreError> {
        self.check(StoreOp::SetStatus, Some(id))?;
        self.inner.set_order_status(id, change).await
    }

    async fn set_order_products(&self, id: &OrderId, products: Products) -> Result<Order, StoreError> {
        self.check(StoreOp::SetProducts, Some(id))?;
        self.inner.set_order_products(id, products).await
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), StoreError> {
        self.check(StoreOp::Delete, Some(id))?;
        self.inner.delete_order(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, TemplateAction, TemplateActionResult};
    use crate::clients::CatalogClient;
    use crate::domain::{ProductKey, ProductTemplate, SpecKey};
    use crate::lifecycle::OrderError;

    #[tokio::test]
    async fn test_mock_catalog_client() {
        let (inner, mut receiver) = create_mock_client::<ProductTemplate>(10);
        let client = CatalogClient::new(inner);

        let add = tokio::spawn({
            let client = client.clone();
            async move { client.add_spec(ProductKey::from("saddle"), "Seat Color".to_string()).await }
        });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action");
        assert_eq!(id.as_str(), "saddle");
        assert!(matches!(action, TemplateAction::AddSpec(ref raw) if raw == "Seat Color"));
        let template = ProductTemplate::new("saddle", "Saddle", &["seatColor"], 7);
        responder
            .send(Ok(TemplateActionResult::SpecAdded { key: SpecKey::from("seatColor"), template }))
            .unwrap();
        assert_eq!(add.await.unwrap(), Ok(SpecKey::from("seatColor")));

        let rename = tokio::spawn(async move {
            client.rename_template(ProductKey::from("saddle"), "   ".to_string()).await
        });
        let (_, patch, responder) = expect_update(&mut receiver).await.expect("Expected Update");
        assert_eq!(patch.name.as_deref(), Some("   "));
        responder.send(Err(FrameworkError::Rejected("Template name is empty".into()))).unwrap();
        assert_eq!(
            rename.await.unwrap(),
            Err(CatalogError::ValidationError("Template name is empty".into()))
        );
    }

    #[tokio::test]
    async fn test_mock_add_template_sends_default_specs() {
        let (inner, mut receiver) = create_mock_client::<ProductTemplate>(10);
        let client = CatalogClient::new(inner);
        let add = tokio::spawn(async move { client.add_template("Fly Mask".to_string()).await });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create");
        assert_eq!(params.name, "Fly Mask");
        assert!(params.specs.is_empty());
        responder.send(Ok(ProductTemplate::new("tpl_1", "Fly Mask", &[], 8))).unwrap();
        assert_eq!(add.await.unwrap().unwrap().sort_order, 8);
    }

    #[tokio::test]
    async fn test_order_client_times_out_on_silent_service() {
        let (client, mut receiver) = create_mock_order_client(Duration::from_millis(50));
        let call = tokio::spawn(async move { client.free_carts().await });

        // Hold the request without answering it.
        let _pending = receiver.recv().await.expect("Expected FreeCarts");
        let result = call.await.unwrap();
        assert!(matches!(result, Err(OrderError::ActorCommunicationError(_))));
    }

    #[tokio::test]
    async fn test_timed_out_mutation_is_still_delivered() {
        let (client, mut receiver) = create_mock_order_client(Duration::from_millis(20));
        let new_order = NewOrder {
            first_name: "A".into(),
            last_name: "B".into(),
            products: Products::new(),
            cart_number: crate::domain::CartNumber::UNASSIGNED,
            status: crate::domain::OrderStatus::Waiting,
        };
        let result = client.create_order(new_order.clone()).await;
        assert!(matches!(result, Err(OrderError::ActorCommunicationError(_))));

        // The service still finds the request in its mailbox; only the answer is lost.
        match receiver.recv().await {
            Some(OrderRequest::CreateOrder { order, respond_to }) => {
                assert_eq!(order, new_order);
                assert!(respond_to.send(Err(OrderError::NoCartAvailable)).is_err());
            }
            other => panic!("Expected CreateOrder, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_order_client_reports_closed_service() {
        let (client, receiver) = create_mock_order_client(Duration::from_secs(1));
        drop(receiver);
        assert_eq!(
            client.list_orders().await,
            Err(OrderError::ActorCommunicationError("Actor closed".into()))
        );
    }

    #[tokio::test]
    async fn test_failing_store_fails_chosen_orders_only() {
        let (store, _handle) = FailingStore::spawn(Vec::new());
        let order = store
            .create_order(NewOrder {
                first_name: "A".into(),
                last_name: "B".into(),
                products: Products::new(),
                cart_number: crate::domain::CartNumber::UNASSIGNED,
                status: crate::domain::OrderStatus::Waiting,
            })
            .await
            .unwrap();
        store.fail_order(order.id.clone());
        assert!(store.delete_order(&order.id).await.is_err());
        assert_eq!(store.list_orders().await.unwrap().len(), 1);
        assert_eq!(store.calls(), vec![StoreOp::Create, StoreOp::Delete, StoreOp::List]);
    }
}
