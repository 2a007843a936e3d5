use crate::domain::{ProductTemplate, SpecKey};

/// Creation parameters for a template. The sort order is assigned on insert.
#[derive(Debug, Clone)]
pub struct TemplateCreate {
    pub name: String,
    pub specs: Vec<SpecKey>,
}

impl Default for TemplateCreate {
    fn default() -> Self {
        Self { name: "New Product".to_string(), specs: Vec::new() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub sort_order: Option<i64>,
}

/// Edits to a template's spec list.
#[derive(Debug, Clone)]
pub enum TemplateAction {
    /// Adds a field from raw operator input; the input is normalized first.
    AddSpec(String),
    RemoveSpec(SpecKey),
}

/// Results from TemplateActions - the template after the edit.
#[derive(Debug, Clone)]
pub enum TemplateActionResult {
    SpecAdded { key: SpecKey, template: ProductTemplate },
    SpecRemoved(ProductTemplate),
}
