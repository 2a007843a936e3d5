//! System orchestration, startup, and shutdown logic.

pub mod error;
pub mod system;
pub mod tracing;

pub use error::*;
pub use system::*;
pub use self::tracing::setup_tracing;
