//! Domain types for the workshop: orders, their product lines, carts and
//! catalog templates. Plain data with no actor-specific concerns.

pub mod cart;
pub mod order;
pub mod product;
pub mod template;

pub use cart::*;
pub use order::*;
pub use product::*;
pub use template::*;
