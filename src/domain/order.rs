use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartNumber;
use super::product::{ProductKey, ProductLine, Products};

/// Opaque order identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Waiting,
    Completed,
    Archived,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Open => "open",
            OrderStatus::Waiting => "waiting",
            OrderStatus::Completed => "completed",
            OrderStatus::Archived => "archived",
        };
        f.write_str(name)
    }
}

/// A customer order as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub products: Products,
    #[serde(default)]
    pub cart_number: CartNumber,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

/// Order data before the store has assigned an id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub first_name: String,
    pub last_name: String,
    pub products: Products,
    pub cart_number: CartNumber,
    pub status: OrderStatus,
}

impl Order {
    pub fn from_new(id: OrderId, new: NewOrder, now: DateTime<Utc>) -> Self {
        // Waiting orders never hold a cart, whatever the caller passed.
        let cart_number = match new.status {
            OrderStatus::Waiting => CartNumber::UNASSIGNED,
            _ => new.cart_number,
        };
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            products: new.products,
            cart_number,
            status: new.status,
            created_at: now,
            updated_at: now,
            archived_at: (new.status == OrderStatus::Archived).then_some(now),
        }
    }

    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Lines shown to the customer: selected ones only.
    pub fn selected_products(&self) -> impl Iterator<Item = (&ProductKey, &ProductLine)> {
        self.products.iter().filter(|(_, line)| line.selected)
    }

    pub fn total_quantity(&self) -> u64 {
        self.selected_products().map(|(_, line)| u64::from(line.quantity)).sum()
    }

    pub fn holds_cart(&self) -> bool {
        self.status == OrderStatus::Open && self.cart_number.is_assigned()
    }

    /// Case-insensitive exact match on both names.
    pub fn matches_customer(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name.to_lowercase() == first_name.to_lowercase()
            && self.last_name.to_lowercase() == last_name.to_lowercase()
    }

    /// Case-insensitive substring match on either name or any selected line's name.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.first_name.to_lowercase().contains(&term)
            || self.last_name.to_lowercase().contains(&term)
            || self
                .selected_products()
                .any(|(_, line)| line.name.to_lowercase().contains(&term))
    }

    /// Checks the record-level invariants; returns the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.status == OrderStatus::Waiting && self.cart_number.is_assigned() {
            return Err(format!("waiting order {} holds cart {}", self.id, self.cart_number));
        }
        if (self.status == OrderStatus::Archived) != self.archived_at.is_some() {
            return Err(format!("order {} has archivedAt inconsistent with status {}", self.id, self.status));
        }
        if self.updated_at < self.created_at {
            return Err(format!("order {} was updated before it was created", self.id));
        }
        Ok(())
    }
}
