//! Cart pool accounting. Occupancy is derived from the open orders every
//! time; nothing is stored separately.

use std::collections::BTreeSet;

use crate::domain::{CartNumber, Order};

pub fn occupied_carts<'a>(orders: impl IntoIterator<Item = &'a Order>) -> BTreeSet<CartNumber> {
    orders
        .into_iter()
        .filter(|o| o.holds_cart())
        .map(|o| o.cart_number)
        .collect()
}

pub fn free_carts<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<CartNumber> {
    let occupied = occupied_carts(orders);
    CartNumber::all().filter(|c| !occupied.contains(c)).collect()
}

/// Lowest cart not held by an open order.
pub fn first_free_cart<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Option<CartNumber> {
    let occupied = occupied_carts(orders);
    CartNumber::all().find(|c| !occupied.contains(c))
}

/// The open order currently holding `cart`, if any.
pub fn holder_of<'a>(orders: impl IntoIterator<Item = &'a Order>, cart: CartNumber) -> Option<&'a Order> {
    orders.into_iter().find(|o| o.holds_cart() && o.cart_number == cart)
}
