use thiserror::Error;

use super::transitions::LifecycleAction;
use crate::domain::{CartNumber, OrderId, OrderStatus, ProductKey, SpecKey};
use crate::store::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("No cart available: all carts are held by open orders")]
    NoCartAvailable,
    #[error("Cart {cart} is already held by open order {holder}")]
    CartOccupied { cart: CartNumber, holder: OrderId },
    #[error("Cannot {action} order {id} while it is {from}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        action: LifecycleAction,
    },
    #[error("Deletion of order {0} was not confirmed")]
    DeletionNotConfirmed(OrderId),
    #[error("Unknown product line: {0}")]
    UnknownProduct(ProductKey),
    #[error("Product line {product} has no spec {field}")]
    UnknownSpec { product: ProductKey, field: SpecKey },
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::StoreUnavailable(other.to_string()),
        }
    }
}
