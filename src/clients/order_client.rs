use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{CartNumber, NewOrder, Order, OrderId, OrderStatus, Products};
use crate::lifecycle::{ArchiveReport, Confirmation, OrderError};
use crate::messages::OrderRequest;

/// Client for the order lifecycle service.
///
/// Every call waits at most `timeout` for the service to answer. A timed-out
/// request has already been queued and the service still carries it out, so
/// after an `ActorCommunicationError` from a mutation check the current state
/// (`get_order`, `customer_history`) before sending it again.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
    timeout: Duration,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    /// Orders in one status, newest first.
    pub async fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        self.search(Some(status), String::new()).await
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), OrderError> {
        debug!("Sending shutdown request");
        self.sender
            .send(OrderRequest::Shutdown)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(OrderClient => fn reload() -> usize as OrderRequest::Reload, Error = OrderError);
client_method!(OrderClient => fn list_orders() -> Vec<Order> as OrderRequest::ListOrders, Error = OrderError);
client_method!(OrderClient => fn get_order(id: OrderId) -> Option<Order> as OrderRequest::GetOrder, Error = OrderError);
client_method!(OrderClient => fn search(status: Option<OrderStatus>, term: String) -> Vec<Order> as OrderRequest::Search, Error = OrderError);
client_method!(OrderClient => fn customer_history(first_name: String, last_name: String) -> Vec<Order> as OrderRequest::CustomerHistory, Error = OrderError);
client_method!(OrderClient => fn free_carts() -> Vec<CartNumber> as OrderRequest::FreeCarts, Error = OrderError);
client_method!(OrderClient => fn create_order(order: NewOrder) -> Order as OrderRequest::CreateOrder, Error = OrderError);
client_method!(OrderClient => fn move_to_open(id: OrderId) -> Order as OrderRequest::MoveToOpen, Error = OrderError);
client_method!(OrderClient => fn complete_order(id: OrderId) -> Order as OrderRequest::CompleteOrder, Error = OrderError);
client_method!(OrderClient => fn archive_completed() -> ArchiveReport as OrderRequest::ArchiveCompleted, Error = OrderError);
client_method!(OrderClient => fn update_products(id: OrderId, products: Products) -> Order as OrderRequest::UpdateProducts, Error = OrderError);
client_method!(OrderClient => fn delete_order(id: OrderId, confirmation: Confirmation) -> () as OrderRequest::DeleteOrder, Error = OrderError);
