//! Catalog registry: the administrator-maintained list of product templates.

mod actions;
pub mod defaults;
mod entity;
pub mod error;
pub mod spec_name;

pub use actions::*;
pub use defaults::default_catalog;
pub use error::*;
