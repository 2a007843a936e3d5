use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::book::OrderBook;
use super::error::OrderError;
use super::transitions::Confirmation;
use crate::clients::OrderClient;
use crate::domain::{NewOrder, Order, OrderId, Products};
use crate::messages::{OrderRequest, ServiceResponse};
use crate::store::{OrderStore, StatusChange};

/// Outcome of a bulk archive. Each order is archived on its own; one failure
/// does not undo or block the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveReport {
    pub archived: Vec<OrderId>,
    pub failed: Vec<(OrderId, OrderError)>,
}

/// The order lifecycle engine.
///
/// Owns the order view and is the only component that changes an order's
/// status or cart. Requests are handled one at a time, so cart allocation and
/// every per-order mutation are serialized.
pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    store: Arc<dyn OrderStore>,
    book: OrderBook,
}

impl OrderService {
    pub fn new(buffer_size: usize, store: Arc<dyn OrderStore>, request_timeout: Duration) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            store,
            book: OrderBook::default(),
        };
        let client = OrderClient::new(sender, request_timeout);
        (service, client)
    }

    #[instrument(name = "order_service", skip(self))]
    pub async fn run(mut self) {
        info!("OrderService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::Reload { respond_to } => {
                    self.handle_reload(respond_to).await;
                }
                OrderRequest::ListOrders { respond_to } => {
                    let _ = respond_to.send(Ok(self.book.newest_first()));
                }
                OrderRequest::GetOrder { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.book.get(&id).cloned()));
                }
                OrderRequest::Search { status, term, respond_to } => {
                    let _ = respond_to.send(Ok(self.book.search(status, &term)));
                }
                OrderRequest::CustomerHistory { first_name, last_name, respond_to } => {
                    let _ = respond_to.send(Ok(self.book.customer_history(&first_name, &last_name)));
                }
                OrderRequest::FreeCarts { respond_to } => {
                    let _ = respond_to.send(Ok(self.book.free_carts()));
                }
                OrderRequest::CreateOrder { order, respond_to } => {
                    self.handle_create_order(order, respond_to).await;
                }
                OrderRequest::MoveToOpen { id, respond_to } => {
                    self.handle_move_to_open(id, respond_to).await;
                }
                OrderRequest::CompleteOrder { id, respond_to } => {
                    self.handle_complete_order(id, respond_to).await;
                }
                OrderRequest::ArchiveCompleted { respond_to } => {
                    self.handle_archive_completed(respond_to).await;
                }
                OrderRequest::UpdateProducts { id, products, respond_to } => {
                    self.handle_update_products(id, products, respond_to).await;
                }
                OrderRequest::DeleteOrder { id, confirmation, respond_to } => {
                    self.handle_delete_order(id, confirmation, respond_to).await;
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
            }
        }
        info!("OrderService stopped");
    }

    /// Replaces the view with whatever the store currently holds.
    #[instrument(skip(self, respond_to))]
    async fn handle_reload(&mut self, respond_to: ServiceResponse<usize, OrderError>) {
        debug!("Processing reload request");
        let result = match self.store.list_orders().await {
            Ok(orders) => {
                for order in &orders {
                    if let Err(violation) = order.check_invariants() {
                        warn!(%violation, "Loaded order violates an invariant");
                    }
                }
                self.book.replace_all(orders);
                info!(count = self.book.len(), "Orders loaded");
                Ok(self.book.len())
            }
            Err(e) => {
                error!(error = %e, "Failed to load orders");
                Err(OrderError::from(e))
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(
        fields(status = %order.status, cart = %order.cart_number),
        skip(self, order, respond_to)
    )]
    async fn handle_create_order(&mut self, order: NewOrder, respond_to: ServiceResponse<Order, OrderError>) {
        debug!("Processing create_order request");

        if let Err(e) = self.book.plan_create(&order) {
            warn!(error = %e, "Order rejected");
            let _ = respond_to.send(Err(e));
            return;
        }

        let result = match self.store.create_order(order).await {
            Ok(created) => {
                info!(order_id = %created.id, "Order created successfully");
                self.book.upsert(created.clone());
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "Store rejected new order");
                Err(OrderError::from(e))
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    async fn handle_move_to_open(&mut self, id: OrderId, respond_to: ServiceResponse<Order, OrderError>) {
        debug!("Processing move_to_open request");

        let cart = match self.book.plan_move_to_open(&id) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "Order stays where it is");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        let result = match self.store.set_order_status(&id, StatusChange::open_on(cart)).await {
            Ok(order) => {
                info!(cart = %cart, "Order moved to open");
                self.book.upsert(order.clone());
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Store rejected move to open");
                Err(OrderError::from(e))
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    async fn handle_complete_order(&mut self, id: OrderId, respond_to: ServiceResponse<Order, OrderError>) {
        debug!("Processing complete_order request");

        let change = match self.book.plan_complete(&id) {
            Ok(change) => change,
            Err(e) => {
                warn!(error = %e, "Order cannot be completed");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        let result = match self.store.set_order_status(&id, change).await {
            Ok(order) => {
                info!(cart = %order.cart_number, "Order completed, cart released");
                self.book.upsert(order.clone());
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Store rejected completion");
                Err(OrderError::from(e))
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_archive_completed(&mut self, respond_to: ServiceResponse<ArchiveReport, OrderError>) {
        debug!("Processing archive_completed request");

        let mut report = ArchiveReport::default();
        for id in self.book.completed_ids() {
            let change = match self.book.plan_archive(&id) {
                Ok(change) => change,
                Err(e) => {
                    report.failed.push((id, e));
                    continue;
                }
            };
            match self.store.set_order_status(&id, change).await {
                Ok(order) => {
                    debug!(order_id = %id, "Order archived");
                    self.book.upsert(order);
                    report.archived.push(id);
                }
                Err(e) => {
                    error!(order_id = %id, error = %e, "Failed to archive order");
                    report.failed.push((id, OrderError::from(e)));
                }
            }
        }

        info!(
            archived = report.archived.len(),
            failed = report.failed.len(),
            "Archive of completed orders finished"
        );
        let _ = respond_to.send(Ok(report));
    }

    #[instrument(fields(order_id = %id, lines = products.len()), skip(self, products, respond_to))]
    async fn handle_update_products(
        &mut self,
        id: OrderId,
        products: Products,
        respond_to: ServiceResponse<Order, OrderError>,
    ) {
        debug!("Processing update_products request");

        if let Err(e) = self.book.plan_update_products(&id, &products) {
            warn!(error = %e, "Product edit rejected");
            let _ = respond_to.send(Err(e));
            return;
        }

        let result = match self.store.set_order_products(&id, products).await {
            Ok(order) => {
                info!(total = order.total_quantity(), "Products updated");
                self.book.upsert(order.clone());
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Store rejected product edit");
                Err(OrderError::from(e))
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    async fn handle_delete_order(
        &mut self,
        id: OrderId,
        confirmation: Confirmation,
        respond_to: ServiceResponse<(), OrderError>,
    ) {
        debug!("Processing delete_order request");

        if let Err(e) = self.book.plan_delete(&id, confirmation) {
            warn!(error = %e, "Delete refused");
            let _ = respond_to.send(Err(e));
            return;
        }

        let result = match self.store.delete_order(&id).await {
            Ok(()) => {
                info!("Order deleted");
                self.book.remove(&id);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Store rejected delete");
                Err(OrderError::from(e))
            }
        };
        let _ = respond_to.send(result);
    }
}
