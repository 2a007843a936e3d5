use serde::{Deserialize, Serialize};

use super::product::{ProductKey, SpecKey};

/// Catalog template ids double as the product keys of orders built from them.
pub type TemplateId = ProductKey;

/// A purchasable product type and its customizable spec fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTemplate {
    pub id: TemplateId,
    pub name: String,
    pub specs: Vec<SpecKey>,
    pub sort_order: i64,
}

impl ProductTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, specs: &[&str], sort_order: i64) -> Self {
        Self {
            id: ProductKey::new(id),
            name: name.into(),
            specs: specs.iter().map(|s| SpecKey::from(*s)).collect(),
            sort_order,
        }
    }
}

/// Sorts templates for display and draft construction.
pub fn sort_templates(templates: &mut [ProductTemplate]) {
    templates.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
}
