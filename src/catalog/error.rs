use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Catalog validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CatalogError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => CatalogError::NotFound(id),
            FrameworkError::Rejected(reason) => CatalogError::ValidationError(reason),
            other => CatalogError::ActorCommunicationError(other.to_string()),
        }
    }
}
