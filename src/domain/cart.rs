use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest physical cart number on the shop floor.
pub const CART_COUNT: u8 = 10;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cart number {0} is outside 0..=10")]
pub struct InvalidCartNumber(pub u8);

/// A physical cart, or `UNASSIGNED` (0) for orders that are not on a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CartNumber(u8);

impl CartNumber {
    pub const UNASSIGNED: CartNumber = CartNumber(0);

    pub fn new(number: u8) -> Result<Self, InvalidCartNumber> {
        if number > CART_COUNT {
            return Err(InvalidCartNumber(number));
        }
        Ok(Self(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// Every real cart, lowest first.
    pub fn all() -> impl Iterator<Item = CartNumber> {
        (1..=CART_COUNT).map(CartNumber)
    }
}

impl TryFrom<u8> for CartNumber {
    type Error = InvalidCartNumber;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CartNumber> for u8 {
    fn from(cart: CartNumber) -> u8 {
        cart.0
    }
}

impl fmt::Display for CartNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
