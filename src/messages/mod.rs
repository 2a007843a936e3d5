use tokio::sync::oneshot;

use crate::domain::{CartNumber, NewOrder, Order, OrderId, OrderStatus, Products};
use crate::lifecycle::{ArchiveReport, Confirmation, OrderError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the order lifecycle service. Each variant includes
/// parameters and a oneshot channel for responses.
#[derive(Debug)]
pub enum OrderRequest {
    Reload {
        respond_to: ServiceResponse<usize, OrderError>,
    },
    ListOrders {
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    GetOrder {
        id: OrderId,
        respond_to: ServiceResponse<Option<Order>, OrderError>,
    },
    Search {
        status: Option<OrderStatus>,
        term: String,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    CustomerHistory {
        first_name: String,
        last_name: String,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    FreeCarts {
        respond_to: ServiceResponse<Vec<CartNumber>, OrderError>,
    },
    CreateOrder {
        order: NewOrder,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    MoveToOpen {
        id: OrderId,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    CompleteOrder {
        id: OrderId,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    ArchiveCompleted {
        respond_to: ServiceResponse<ArchiveReport, OrderError>,
    },
    UpdateProducts {
        id: OrderId,
        products: Products,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    DeleteOrder {
        id: OrderId,
        confirmation: Confirmation,
        respond_to: ServiceResponse<(), OrderError>,
    },
    Shutdown,
}
