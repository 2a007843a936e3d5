use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::catalog::{CatalogError, TemplateAction, TemplateActionResult, TemplateCreate, TemplatePatch};
use crate::domain::{sort_templates, ProductKey, ProductTemplate, SpecKey};

/// Client for the catalog registry actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<ProductTemplate>,
}

impl_basic_client!(CatalogClient, ProductTemplate, CatalogError, template);

impl CatalogClient {
    /// Every template, in catalog order.
    #[instrument(skip(self))]
    pub async fn list_templates(&self) -> Result<Vec<ProductTemplate>, CatalogError> {
        debug!("Sending request");
        let mut templates = self.inner.list().await?;
        sort_templates(&mut templates);
        Ok(templates)
    }

    /// Appends a template with no spec fields.
    #[instrument(skip(self))]
    pub async fn add_template(&self, name: String) -> Result<ProductTemplate, CatalogError> {
        debug!("Sending request");
        let params = TemplateCreate { name, ..TemplateCreate::default() };
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn rename_template(&self, id: ProductKey, name: String) -> Result<ProductTemplate, CatalogError> {
        debug!("Sending request");
        let patch = TemplatePatch { name: Some(name), ..TemplatePatch::default() };
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_sort_order(&self, id: ProductKey, sort_order: i64) -> Result<ProductTemplate, CatalogError> {
        debug!("Sending request");
        let patch = TemplatePatch { sort_order: Some(sort_order), ..TemplatePatch::default() };
        Ok(self.inner.update(id, patch).await?)
    }

    /// Adds a spec field from raw operator input and returns the stored key.
    #[instrument(skip(self))]
    pub async fn add_spec(&self, id: ProductKey, raw_name: String) -> Result<SpecKey, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, TemplateAction::AddSpec(raw_name)).await? {
            TemplateActionResult::SpecAdded { key, .. } => Ok(key),
            other => Err(CatalogError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_spec(&self, id: ProductKey, field: SpecKey) -> Result<ProductTemplate, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, TemplateAction::RemoveSpec(field)).await? {
            TemplateActionResult::SpecRemoved(template) => Ok(template),
            other => Err(CatalogError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }
}
