use crate::domain::{
    sort_templates, CartNumber, NewOrder, Order, OrderStatus, ProductKey, ProductLine, ProductTemplate, Products,
    SpecKey,
};
use crate::lifecycle::{validate_new_order, OrderError};

use super::{line_mut, set_line_spec};

/// An order under construction in the entry form.
///
/// Holds one line per catalog template, in catalog order. Nothing here talks
/// to a service: submitting produces a [`NewOrder`] for the lifecycle service.
#[derive(Debug, Clone)]
pub struct DraftOrder {
    pub first_name: String,
    pub last_name: String,
    cart: Option<CartNumber>,
    templates: Vec<ProductTemplate>,
    lines: Products,
}

impl DraftOrder {
    pub fn from_catalog(templates: &[ProductTemplate]) -> Self {
        let mut templates = templates.to_vec();
        sort_templates(&mut templates);
        let lines = templates.iter().map(|t| (t.id.clone(), blank_line(t))).collect();
        Self {
            first_name: String::new(),
            last_name: String::new(),
            cart: None,
            templates,
            lines,
        }
    }

    /// Lines in catalog order.
    pub fn lines(&self) -> impl Iterator<Item = (&ProductKey, &ProductLine)> {
        self.templates
            .iter()
            .filter_map(|t| self.lines.get(&t.id).map(|line| (&t.id, line)))
    }

    pub fn line(&self, key: &ProductKey) -> Option<&ProductLine> {
        self.lines.get(key)
    }

    pub fn cart(&self) -> Option<CartNumber> {
        self.cart
    }

    pub fn set_customer(&mut self, first_name: impl Into<String>, last_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
    }

    /// Picks a cart for "submit to open"; `None` clears the choice.
    pub fn select_cart(&mut self, cart: Option<u8>) -> Result<(), OrderError> {
        self.cart = match cart {
            None => None,
            Some(n) => {
                let cart = CartNumber::new(n).map_err(|e| OrderError::ValidationError(e.to_string()))?;
                if !cart.is_assigned() {
                    return Err(OrderError::ValidationError("Please select a cart".to_string()));
                }
                Some(cart)
            }
        };
        Ok(())
    }

    pub fn set_selected(&mut self, key: &ProductKey, selected: bool) -> Result<(), OrderError> {
        line_mut(&mut self.lines, key)?.selected = selected;
        Ok(())
    }

    pub fn toggle(&mut self, key: &ProductKey) -> Result<(), OrderError> {
        let line = line_mut(&mut self.lines, key)?;
        line.selected = !line.selected;
        Ok(())
    }

    /// Sets the quantity from raw form input; anything non-numeric becomes 0.
    pub fn set_quantity(&mut self, key: &ProductKey, input: &str) -> Result<(), OrderError> {
        line_mut(&mut self.lines, key)?.set_quantity_input(input);
        Ok(())
    }

    pub fn set_spec(&mut self, key: &ProductKey, field: &SpecKey, value: impl Into<String>) -> Result<(), OrderError> {
        set_line_spec(&mut self.lines, key, field, value.into())
    }

    /// Copies the selection and spec values of a previous order's selected
    /// lines. Quantities start again at 0. Lines and fields that are no longer
    /// in the catalog are skipped.
    pub fn apply_previous(&mut self, previous: &Order) {
        self.lines = self.templates.iter().map(|t| (t.id.clone(), blank_line(t))).collect();
        for (key, old) in previous.selected_products() {
            let Some(line) = self.lines.get_mut(key) else {
                continue;
            };
            line.selected = true;
            line.quantity = 0;
            for (field, value) in old.specs.iter() {
                line.specs.set(field, value);
            }
        }
    }

    /// Follows catalog edits: renamed templates rename their line, new spec
    /// fields start empty, removed templates and fields disappear. Values the
    /// operator already entered are kept.
    pub fn refresh_catalog(&mut self, templates: &[ProductTemplate]) {
        let mut templates = templates.to_vec();
        sort_templates(&mut templates);

        let mut lines = Products::new();
        for template in &templates {
            let mut line = blank_line(template);
            if let Some(existing) = self.lines.get(&template.id) {
                line.selected = existing.selected;
                line.quantity = existing.quantity;
                for (field, value) in existing.specs.iter() {
                    line.specs.set(field, value);
                }
            }
            lines.insert(template.id.clone(), line);
        }

        self.templates = templates;
        self.lines = lines;
    }

    /// Clears the customer, the cart and every line.
    pub fn reset(&mut self) {
        self.first_name.clear();
        self.last_name.clear();
        self.cart = None;
        self.lines = self.templates.iter().map(|t| (t.id.clone(), blank_line(t))).collect();
    }

    pub fn selected_count(&self) -> usize {
        self.lines.values().filter(|l| l.selected).count()
    }

    /// Builds an open order on the chosen cart.
    pub fn submit_to_open(&self) -> Result<NewOrder, OrderError> {
        let cart = self
            .cart
            .ok_or_else(|| OrderError::ValidationError("Please select a cart".to_string()))?;
        self.build(OrderStatus::Open, cart)
    }

    /// Builds a waiting order; no cart is needed.
    pub fn submit_to_waiting(&self) -> Result<NewOrder, OrderError> {
        self.build(OrderStatus::Waiting, CartNumber::UNASSIGNED)
    }

    /// Only selected lines are kept in the submitted order.
    fn build(&self, status: OrderStatus, cart_number: CartNumber) -> Result<NewOrder, OrderError> {
        let products = self
            .lines
            .iter()
            .filter(|(_, line)| line.selected)
            .map(|(key, line)| (key.clone(), line.clone()))
            .collect();
        let order = NewOrder {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            products,
            cart_number,
            status,
        };
        validate_new_order(&order)?;
        Ok(order)
    }
}

fn blank_line(template: &ProductTemplate) -> ProductLine {
    ProductLine::blank(template.name.clone(), &template.specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use chrono::Utc;

    fn draft() -> DraftOrder {
        DraftOrder::from_catalog(&default_catalog())
    }

    fn key(k: &str) -> ProductKey {
        ProductKey::from(k)
    }

    #[test]
    fn test_from_catalog_builds_blank_lines_in_catalog_order() {
        let draft = draft();
        let keys: Vec<&str> = draft.lines().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys.first(), Some(&"burnPad"));
        assert_eq!(keys.last(), Some(&"saddle"));
        assert_eq!(keys.len(), 8);

        let saddle = draft.line(&key("saddle")).unwrap();
        assert!(!saddle.selected);
        assert_eq!(saddle.quantity, 0);
        let fields: Vec<&str> = saddle.specs.fields().map(SpecKey::as_str).collect();
        assert_eq!(fields, vec!["type", "baseColor", "stitchColor", "topAccentColor", "bottomAccentColor"]);
        assert!(saddle.specs.iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn test_quantity_input_is_coerced() {
        let mut draft = draft();
        draft.set_quantity(&key("blanket"), "abc").unwrap();
        assert_eq!(draft.line(&key("blanket")).unwrap().quantity, 0);
        draft.set_quantity(&key("blanket"), "3").unwrap();
        assert_eq!(draft.line(&key("blanket")).unwrap().quantity, 3);
        assert!(draft.set_quantity(&key("nope"), "1").is_err());
    }

    #[test]
    fn test_apply_previous_copies_selection_and_specs_but_not_quantity() {
        let mut previous = draft();
        previous.set_customer("Sam", "Vale");
        previous.set_selected(&key("saddle"), true).unwrap();
        previous.set_quantity(&key("saddle"), "5").unwrap();
        previous.set_spec(&key("saddle"), &SpecKey::from("baseColor"), "black").unwrap();
        let previous_order = Order::from_new("o1".into(), previous.submit_to_waiting().unwrap(), Utc::now());

        let mut draft = draft();
        draft.set_selected(&key("blanket"), true).unwrap();
        draft.apply_previous(&previous_order);

        let saddle = draft.line(&key("saddle")).unwrap();
        assert!(saddle.selected);
        assert_eq!(saddle.quantity, 0);
        assert_eq!(saddle.specs.get(&SpecKey::from("baseColor")), Some("black"));
        assert!(!draft.line(&key("blanket")).unwrap().selected);
    }

    #[test]
    fn test_submit_to_open_requires_cart_and_name() {
        let mut draft = draft();
        draft.set_customer("Sam", "Vale");
        assert_eq!(
            draft.submit_to_open(),
            Err(OrderError::ValidationError("Please select a cart".into()))
        );

        draft.select_cart(Some(3)).unwrap();
        let order = draft.submit_to_open().unwrap();
        assert!(order.products.is_empty());
        assert_eq!(order.cart_number.get(), 3);
        assert_eq!(order.status, OrderStatus::Open);

        draft.set_customer("", "Vale");
        assert!(matches!(draft.submit_to_open(), Err(OrderError::ValidationError(_))));
    }

    #[test]
    fn test_select_cart_validates_range() {
        let mut draft = draft();
        assert!(draft.select_cart(Some(11)).is_err());
        assert!(draft.select_cart(Some(0)).is_err());
        draft.select_cart(Some(10)).unwrap();
        assert_eq!(draft.cart().map(CartNumber::get), Some(10));
        draft.select_cart(None).unwrap();
        assert_eq!(draft.cart(), None);
    }

    #[test]
    fn test_submit_to_waiting_keeps_only_selected_lines() {
        let mut draft = draft();
        draft.set_customer("Sam", "Vale");
        draft.select_cart(Some(4)).unwrap();
        draft.set_selected(&key("raincover"), true).unwrap();
        draft.set_quantity(&key("raincover"), "2").unwrap();
        draft.set_quantity(&key("blanket"), "7").unwrap();

        let order = draft.submit_to_waiting().unwrap();
        assert_eq!(order.status, OrderStatus::Waiting);
        assert_eq!(order.cart_number, CartNumber::UNASSIGNED);
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[&key("raincover")].quantity, 2);
    }

    #[test]
    fn test_refresh_catalog_keeps_entered_values() {
        let mut draft = draft();
        draft.set_selected(&key("raincover"), true).unwrap();
        draft.set_spec(&key("raincover"), &SpecKey::from("baseColor"), "navy").unwrap();

        let mut catalog: Vec<ProductTemplate> = default_catalog()
            .into_iter()
            .filter(|t| t.id.as_str() != "saddle")
            .collect();
        let raincover = catalog.iter_mut().find(|t| t.id.as_str() == "raincover").unwrap();
        raincover.name = "Rain Sheet".into();
        raincover.specs.push(SpecKey::from("hoodColor"));
        draft.refresh_catalog(&catalog);

        assert!(draft.line(&key("saddle")).is_none());
        let line = draft.line(&key("raincover")).unwrap();
        assert_eq!(line.name, "Rain Sheet");
        assert!(line.selected);
        assert_eq!(line.specs.get(&SpecKey::from("baseColor")), Some("navy"));
        assert_eq!(line.specs.get(&SpecKey::from("hoodColor")), Some(""));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut draft = draft();
        draft.set_customer("Sam", "Vale");
        draft.select_cart(Some(2)).unwrap();
        draft.toggle(&key("foamPad")).unwrap();
        draft.reset();
        assert!(draft.first_name.is_empty());
        assert_eq!(draft.cart(), None);
        assert_eq!(draft.selected_count(), 0);
    }
}
