use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::OrderError;
use crate::store::StoreError;

/// Failures while bringing the system up or down.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Order store could not be opened: {0}")]
    Store(#[from] StoreError),

    #[error("Initial order load failed: {0}")]
    Load(#[from] OrderError),

    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
