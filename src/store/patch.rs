use chrono::{DateTime, Utc};

use crate::domain::{CartNumber, Order, OrderStatus, Products};

/// Status change requested of the store. `cart_number` is only applied when
/// present; waiting orders always end up unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub cart_number: Option<CartNumber>,
}

impl StatusChange {
    pub fn to(status: OrderStatus) -> Self {
        Self { status, cart_number: None }
    }

    pub fn open_on(cart: CartNumber) -> Self {
        Self { status: OrderStatus::Open, cart_number: Some(cart) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderPatch {
    Status(StatusChange),
    Products(Products),
}

/// Applies a patch the way the document store does, bumping `updatedAt`.
pub fn apply_patch(order: &mut Order, patch: OrderPatch, now: DateTime<Utc>) {
    match patch {
        OrderPatch::Status(change) => {
            order.status = change.status;
            if let Some(cart) = change.cart_number {
                order.cart_number = cart;
            }
            if change.status == OrderStatus::Waiting {
                order.cart_number = CartNumber::UNASSIGNED;
            }
            order.archived_at = (change.status == OrderStatus::Archived).then_some(now);
        }
        OrderPatch::Products(products) => {
            order.products = products;
        }
    }
    order.updated_at = now.max(order.created_at);
}
