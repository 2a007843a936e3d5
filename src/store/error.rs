use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Failures reported by an order store collaborator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Store document is corrupt: {0}")]
    Corrupt(String),
}

impl From<FrameworkError> for StoreError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => StoreError::NotFound(id),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}
