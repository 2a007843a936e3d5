//! Order lifecycle engine: status transitions, cart assignment and the
//! order view they are checked against.

pub mod book;
pub mod cart;
pub mod error;
pub mod service;
pub mod transitions;

pub use book::{validate_new_order, OrderBook};
pub use error::*;
pub use service::*;
pub use transitions::*;
