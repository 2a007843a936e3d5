//! Order lifecycle for a custom-goods workshop.
//!
//! Orders wait for one of ten work carts, are worked on while open, then
//! completed and archived. Every state change goes through a single
//! [`lifecycle::OrderService`] actor, which is what keeps cart allocation
//! consistent. The product catalog lives in its own actor built on the
//! generic [`actor_framework::ResourceActor`].

pub mod actor_framework;
pub mod app_system;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod domain;
pub mod entry;
pub mod lifecycle;
pub mod messages;
pub mod store;

#[cfg(test)]
mod mock_framework;
