use crate::domain::{Order, OrderId, ProductKey, Products, SpecKey};
use crate::lifecycle::OrderError;

use super::{line_mut, set_line_spec};

/// Working copy of an existing order's lines for the edit-products flow.
///
/// Only lines and spec fields the order already has can be changed; the
/// result is handed to the lifecycle service's `update_products`.
#[derive(Debug, Clone)]
pub struct ProductEditor {
    order_id: OrderId,
    products: Products,
}

impl ProductEditor {
    pub fn for_order(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            products: order.products.clone(),
        }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn products(&self) -> &Products {
        &self.products
    }

    pub fn set_selected(&mut self, key: &ProductKey, selected: bool) -> Result<(), OrderError> {
        line_mut(&mut self.products, key)?.selected = selected;
        Ok(())
    }

    pub fn toggle(&mut self, key: &ProductKey) -> Result<(), OrderError> {
        let line = line_mut(&mut self.products, key)?;
        line.selected = !line.selected;
        Ok(())
    }

    pub fn set_quantity(&mut self, key: &ProductKey, input: &str) -> Result<(), OrderError> {
        line_mut(&mut self.products, key)?.set_quantity_input(input);
        Ok(())
    }

    pub fn set_spec(&mut self, key: &ProductKey, field: &SpecKey, value: impl Into<String>) -> Result<(), OrderError> {
        set_line_spec(&mut self.products, key, field, value.into())
    }

    pub fn finish(self) -> (OrderId, Products) {
        (self.order_id, self.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CartNumber, NewOrder, OrderStatus, ProductLine};
    use chrono::Utc;

    fn order() -> Order {
        let mut products = Products::new();
        let mut saddle = ProductLine::blank("Saddle", &[SpecKey::from("baseColor")]);
        saddle.selected = true;
        saddle.quantity = 1;
        products.insert("saddle".into(), saddle);
        Order::from_new(
            "o1".into(),
            NewOrder {
                first_name: "Kit".into(),
                last_name: "Cole".into(),
                products,
                cart_number: CartNumber::new(1).unwrap(),
                status: OrderStatus::Open,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_edits_apply_to_existing_lines() {
        let mut editor = ProductEditor::for_order(&order());
        let saddle = ProductKey::from("saddle");

        editor.set_quantity(&saddle, "4").unwrap();
        editor.set_spec(&saddle, &SpecKey::from("baseColor"), "tan").unwrap();
        editor.toggle(&saddle).unwrap();

        let (id, products) = editor.finish();
        assert_eq!(id.as_str(), "o1");
        let line = &products[&saddle];
        assert_eq!(line.quantity, 4);
        assert!(!line.selected);
        assert_eq!(line.specs.get(&SpecKey::from("baseColor")), Some("tan"));
    }

    #[test]
    fn test_unknown_lines_and_fields_are_rejected() {
        let mut editor = ProductEditor::for_order(&order());
        assert_eq!(
            editor.toggle(&ProductKey::from("blanket")),
            Err(OrderError::UnknownProduct("blanket".into()))
        );
        assert!(matches!(
            editor.set_spec(&ProductKey::from("saddle"), &SpecKey::from("seatColor"), "red"),
            Err(OrderError::UnknownSpec { .. })
        ));
    }
}
