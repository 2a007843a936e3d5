use std::collections::HashMap;

use super::cart;
use super::error::OrderError;
use super::transitions::{check_transition, Confirmation, LifecycleAction};
use crate::domain::{CartNumber, NewOrder, Order, OrderId, OrderStatus, Products};
use crate::store::{sort_newest_first, StatusChange};

/// Checks a new order before it is sent to the store.
pub fn validate_new_order(new: &NewOrder) -> Result<(), OrderError> {
    if new.first_name.trim().is_empty() || new.last_name.trim().is_empty() {
        return Err(OrderError::ValidationError("Please enter customer name".to_string()));
    }
    match new.status {
        OrderStatus::Open if !new.cart_number.is_assigned() => {
            Err(OrderError::ValidationError("Please select a cart".to_string()))
        }
        OrderStatus::Open | OrderStatus::Waiting => Ok(()),
        other => Err(OrderError::ValidationError(format!(
            "New orders must be open or waiting, not {}",
            other
        ))),
    }
}

/// The lifecycle engine's view of every order, as last acknowledged by the store.
///
/// All `plan_*` methods are read-only: they check a request against the
/// current view and report what the store call should be. The view itself only
/// changes through `upsert`/`remove` once the store has confirmed.
#[derive(Debug, Default, Clone)]
pub struct OrderBook {
    orders: HashMap<OrderId, Order>,
}

impl OrderBook {
    pub fn new(orders: Vec<Order>) -> Self {
        let mut book = Self::default();
        book.replace_all(orders);
        book
    }

    pub fn replace_all(&mut self, orders: Vec<Order>) {
        self.orders = orders.into_iter().map(|o| (o.id.clone(), o)).collect();
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    fn require(&self, id: &OrderId) -> Result<&Order, OrderError> {
        self.orders
            .get(id)
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    pub fn upsert(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    pub fn remove(&mut self, id: &OrderId) -> Option<Order> {
        self.orders.remove(id)
    }

    pub fn newest_first(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.values().cloned().collect();
        sort_newest_first(&mut orders);
        orders
    }

    /// Orders in `status` (all when `None`) matching `term`, newest first.
    pub fn search(&self, status: Option<OrderStatus>, term: &str) -> Vec<Order> {
        let term = term.trim();
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .filter(|o| o.matches_search(term))
            .cloned()
            .collect();
        sort_newest_first(&mut orders);
        orders
    }

    /// Every previous order of a customer, newest first. Empty until both names are given.
    pub fn customer_history(&self, first_name: &str, last_name: &str) -> Vec<Order> {
        let (first_name, last_name) = (first_name.trim(), last_name.trim());
        if first_name.is_empty() || last_name.is_empty() {
            return Vec::new();
        }
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|o| o.matches_customer(first_name, last_name))
            .cloned()
            .collect();
        sort_newest_first(&mut orders);
        orders
    }

    pub fn free_carts(&self) -> Vec<CartNumber> {
        cart::free_carts(self.orders.values())
    }

    pub fn plan_create(&self, new: &NewOrder) -> Result<(), OrderError> {
        validate_new_order(new)?;
        if new.status == OrderStatus::Open {
            if let Some(holder) = cart::holder_of(self.orders.values(), new.cart_number) {
                return Err(OrderError::CartOccupied {
                    cart: new.cart_number,
                    holder: holder.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Picks the cart a waiting order will take when moved to open.
    pub fn plan_move_to_open(&self, id: &OrderId) -> Result<CartNumber, OrderError> {
        let order = self.require(id)?;
        check_transition(order, LifecycleAction::MoveToOpen)?;
        cart::first_free_cart(self.orders.values()).ok_or(OrderError::NoCartAvailable)
    }

    pub fn plan_complete(&self, id: &OrderId) -> Result<StatusChange, OrderError> {
        self.plan_status_change(id, LifecycleAction::Complete)
    }

    pub fn plan_archive(&self, id: &OrderId) -> Result<StatusChange, OrderError> {
        self.plan_status_change(id, LifecycleAction::Archive)
    }

    /// The store change for an action that only moves the order to its target status.
    fn plan_status_change(&self, id: &OrderId, action: LifecycleAction) -> Result<StatusChange, OrderError> {
        check_transition(self.require(id)?, action)?;
        action
            .target()
            .map(StatusChange::to)
            .ok_or_else(|| OrderError::ValidationError(format!("{} does not change an order's status", action)))
    }

    /// Ids of every completed order, oldest first.
    pub fn completed_ids(&self) -> Vec<OrderId> {
        let mut completed: Vec<&Order> = self
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Completed)
            .collect();
        completed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        completed.into_iter().map(|o| o.id.clone()).collect()
    }

    /// Product edits may change values but never introduce lines or spec fields.
    pub fn plan_update_products(&self, id: &OrderId, products: &Products) -> Result<(), OrderError> {
        let order = self.require(id)?;
        check_transition(order, LifecycleAction::EditProducts)?;
        for (key, line) in products {
            let existing = order
                .products
                .get(key)
                .ok_or_else(|| OrderError::UnknownProduct(key.clone()))?;
            if let Some(field) = line.specs.fields().find(|f| !existing.specs.contains(f)) {
                return Err(OrderError::UnknownSpec {
                    product: key.clone(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn plan_delete(&self, id: &OrderId, confirmation: Confirmation) -> Result<(), OrderError> {
        check_transition(self.require(id)?, LifecycleAction::Delete)?;
        match confirmation {
            Confirmation::Confirmed => Ok(()),
            Confirmation::Declined => Err(OrderError::DeletionNotConfirmed(id.clone())),
        }
    }
}
