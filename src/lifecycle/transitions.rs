use std::fmt;

use super::error::OrderError;
use crate::domain::{Order, OrderStatus};

/// Operations that the lifecycle engine guards by current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    MoveToOpen,
    Complete,
    Archive,
    Delete,
    EditProducts,
}

impl LifecycleAction {
    /// Status the order ends up in, if the action changes it.
    pub fn target(self) -> Option<OrderStatus> {
        match self {
            LifecycleAction::MoveToOpen => Some(OrderStatus::Open),
            LifecycleAction::Complete => Some(OrderStatus::Completed),
            LifecycleAction::Archive => Some(OrderStatus::Archived),
            LifecycleAction::Delete | LifecycleAction::EditProducts => None,
        }
    }

    pub fn allowed_from(self, status: OrderStatus) -> bool {
        match self {
            LifecycleAction::MoveToOpen => status == OrderStatus::Waiting,
            LifecycleAction::Complete => status == OrderStatus::Open,
            LifecycleAction::Archive => status == OrderStatus::Completed,
            LifecycleAction::Delete => status == OrderStatus::Waiting,
            // Archived is terminal.
            LifecycleAction::EditProducts => status != OrderStatus::Archived,
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            LifecycleAction::MoveToOpen => "move to open",
            LifecycleAction::Complete => "complete",
            LifecycleAction::Archive => "archive",
            LifecycleAction::Delete => "delete",
            LifecycleAction::EditProducts => "edit products of",
        };
        f.write_str(verb)
    }
}

/// Operator answer to the "really delete?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

pub fn check_transition(order: &Order, action: LifecycleAction) -> Result<(), OrderError> {
    if action.allowed_from(order.status) {
        Ok(())
    } else {
        Err(OrderError::InvalidTransition {
            id: order.id.clone(),
            from: order.status,
            action,
        })
    }
}
