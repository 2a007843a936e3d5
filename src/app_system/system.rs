use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::error::SystemError;
use crate::actor_framework::ResourceActor;
use crate::catalog::default_catalog;
use crate::clients::{CatalogClient, OrderClient};
use crate::config::{AppConfig, StoreConfig};
use crate::domain::{ProductKey, ProductTemplate};
use crate::lifecycle::OrderService;
use crate::store::{JsonFileStore, MemoryStore, OrderStore};

/// The running workshop: catalog registry, order store and lifecycle service.
///
/// Responsible for starting the actors, wiring them together, and shutdown.
pub struct WorkshopSystem {
    pub order_client: OrderClient,
    pub catalog_client: CatalogClient,
    handles: Vec<JoinHandle<()>>,
}

impl WorkshopSystem {
    /// Starts every actor and loads the current orders from the configured store.
    #[instrument(skip(config), fields(store = ?config.store))]
    pub async fn start(config: &AppConfig) -> Result<Self, SystemError> {
        let (catalog_client, catalog_handle) = spawn_catalog(config.channel_buffer);
        let mut handles = vec![catalog_handle];

        // Order store
        let store: Arc<dyn OrderStore> = match &config.store {
            StoreConfig::Memory => {
                let (store, handle) = MemoryStore::spawn(config.channel_buffer);
                handles.push(handle);
                Arc::new(store)
            }
            StoreConfig::JsonFile { path } => Arc::new(JsonFileStore::open(path).await?),
        };

        Self::with_store(config, store, catalog_client, handles).await
    }

    /// Starts the lifecycle service on an already opened store.
    pub async fn start_with_store(config: &AppConfig, store: Arc<dyn OrderStore>) -> Result<Self, SystemError> {
        let (catalog_client, catalog_handle) = spawn_catalog(config.channel_buffer);
        Self::with_store(config, store, catalog_client, vec![catalog_handle]).await
    }

    async fn with_store(
        config: &AppConfig,
        store: Arc<dyn OrderStore>,
        catalog_client: CatalogClient,
        mut handles: Vec<JoinHandle<()>>,
    ) -> Result<Self, SystemError> {
        let (service, order_client) = OrderService::new(config.channel_buffer, store, config.request_timeout());
        handles.push(tokio::spawn(service.run()));

        let system = Self {
            order_client,
            catalog_client,
            handles,
        };

        match system.order_client.reload().await {
            Ok(count) => {
                info!(orders = count, "Workshop system started");
                Ok(system)
            }
            Err(e) => {
                error!(error = %e, "Initial load failed");
                // Best effort: the load error is what the caller needs to see.
                let _ = system.shutdown().await;
                Err(SystemError::Load(e))
            }
        }
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        if let Err(e) = self.order_client.shutdown().await {
            error!(error = %e, "Lifecycle service already gone");
        }

        // Dropping the last clients closes the remaining mailboxes.
        drop(self.order_client);
        drop(self.catalog_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

/// Catalog registry, seeded with the standard line-up. New templates get uuid keys.
fn spawn_catalog(buffer_size: usize) -> (CatalogClient, JoinHandle<()>) {
    let next_template_id = || ProductKey::new(Uuid::new_v4().simple().to_string());
    let (actor, inner) = ResourceActor::<ProductTemplate>::with_entries(buffer_size, next_template_id, default_catalog());
    (CatalogClient::new(inner), tokio::spawn(actor.run()))
}
