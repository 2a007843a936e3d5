use crate::actor_framework::Entity;
use crate::domain::{ProductKey, ProductTemplate};

use super::actions::{TemplateAction, TemplateActionResult, TemplateCreate, TemplatePatch};
use super::spec_name;

impl Entity for ProductTemplate {
    type Id = ProductKey;
    type CreateParams = TemplateCreate;
    type Patch = TemplatePatch;
    type Action = TemplateAction;
    type ActionResult = TemplateActionResult;

    fn id(&self) -> &ProductKey {
        &self.id
    }

    /// Creates a new template from creation parameters.
    ///
    /// # Errors
    /// Rejects blank names.
    fn from_create_params(id: ProductKey, params: TemplateCreate) -> Result<Self, String> {
        let name = validated_name(&params.name)?;
        Ok(Self {
            id,
            name,
            specs: params.specs,
            sort_order: 0,
        })
    }

    /// Appends the template after every existing one.
    fn on_create(&mut self, siblings: &[&Self]) -> Result<(), String> {
        self.sort_order = siblings
            .iter()
            .map(|t| t.sort_order)
            .max()
            .map_or(0, |max| max + 1);
        Ok(())
    }

    /// Renames and/or moves the template.
    ///
    /// # Fields Updated
    /// - `name`: display name, trimmed; blank names are rejected
    /// - `sort_order`: position in the catalog
    fn on_update(&mut self, patch: TemplatePatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = validated_name(&name)?;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        Ok(())
    }

    /// Handles spec list edits.
    ///
    /// # Errors
    /// Adding blank or duplicate fields, or removing an unknown one, fails.
    fn handle_action(&mut self, action: TemplateAction) -> Result<TemplateActionResult, String> {
        match action {
            TemplateAction::AddSpec(raw) => {
                let key = spec_name::normalize(&raw).ok_or_else(|| "Spec name is empty".to_string())?;
                if self.specs.contains(&key) {
                    return Err(format!("Template {} already has spec {}", self.id, key));
                }
                self.specs.push(key.clone());
                Ok(TemplateActionResult::SpecAdded { key, template: self.clone() })
            }
            TemplateAction::RemoveSpec(key) => {
                let before = self.specs.len();
                self.specs.retain(|s| s != &key);
                if self.specs.len() == before {
                    return Err(format!("Template {} has no spec {}", self.id, key));
                }
                Ok(TemplateActionResult::SpecRemoved(self.clone()))
            }
        }
    }
}

fn validated_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Template name is empty".to_string());
    }
    Ok(trimmed.to_string())
}
