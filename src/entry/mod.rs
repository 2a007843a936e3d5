//! Order entry: building new orders from the catalog and editing the
//! product lines of existing ones.

pub mod draft;
pub mod editor;

pub use draft::DraftOrder;
pub use editor::ProductEditor;

use crate::domain::{ProductKey, ProductLine, Products, SpecKey};
use crate::lifecycle::OrderError;

/// Line edits shared by the entry form and the edit-products flow.
pub(crate) fn line_mut<'a>(products: &'a mut Products, key: &ProductKey) -> Result<&'a mut ProductLine, OrderError> {
    products
        .get_mut(key)
        .ok_or_else(|| OrderError::UnknownProduct(key.clone()))
}

pub(crate) fn set_line_spec(
    products: &mut Products,
    key: &ProductKey,
    field: &SpecKey,
    value: String,
) -> Result<(), OrderError> {
    let line = line_mut(products, key)?;
    if line.specs.set(field, value) {
        Ok(())
    } else {
        Err(OrderError::UnknownSpec {
            product: key.clone(),
            field: field.clone(),
        })
    }
}
