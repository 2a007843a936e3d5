use anyhow::{Context, Result};
use tracing::{error, info, Instrument};

use cart_orders::app_system::{setup_tracing, WorkshopSystem};
use cart_orders::config::AppConfig;
use cart_orders::domain::{ProductKey, SpecKey};
use cart_orders::entry::{DraftOrder, ProductEditor};
use cart_orders::lifecycle::Confirmation;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    setup_tracing(&config.log_filter);

    info!(store = ?config.store, "Starting workshop order system");
    let system = WorkshopSystem::start(&config).await.context("starting system")?;

    let templates = system.catalog_client.list_templates().await?;
    let saddle = ProductKey::from("saddle");
    let base_color = SpecKey::from("baseColor");

    // A walk-in order straight onto cart 1
    let span = tracing::info_span!("order_entry");
    let first = async {
        let mut draft = DraftOrder::from_catalog(&templates);
        draft.set_customer("Avery", "Stone");
        draft.select_cart(Some(1))?;
        draft.set_selected(&saddle, true)?;
        draft.set_quantity(&saddle, "2")?;
        draft.set_spec(&saddle, &base_color, "black")?;
        let order = system.order_client.create_order(draft.submit_to_open()?).await?;
        info!(order_id = %order.id, cart = %order.cart_number, "Order placed on cart");
        anyhow::Ok(order)
    }
    .instrument(span)
    .await?;

    // A repeat customer goes on the waiting list, then gets the next free cart
    let history = system
        .order_client
        .customer_history("avery".to_string(), "STONE".to_string())
        .await?;
    let mut draft = DraftOrder::from_catalog(&templates);
    draft.set_customer("Avery", "Stone");
    if let Some(previous) = history.first() {
        draft.apply_previous(previous);
    }
    draft.set_quantity(&saddle, "1")?;
    let waiting = system.order_client.create_order(draft.submit_to_waiting()?).await?;
    let opened = system.order_client.move_to_open(waiting.id.clone()).await?;
    info!(order_id = %opened.id, cart = %opened.cart_number, "Waiting order moved to open");

    let mut editor = ProductEditor::for_order(&opened);
    editor.set_spec(&saddle, &base_color, "havana")?;
    let (id, products) = editor.finish();
    system.order_client.update_products(id, products).await?;

    // A waiting order the customer cancels
    let mut draft = DraftOrder::from_catalog(&templates);
    draft.set_customer("Robin", "Hale");
    let cancelled = system.order_client.create_order(draft.submit_to_waiting()?).await?;
    system
        .order_client
        .delete_order(cancelled.id, Confirmation::Confirmed)
        .await?;

    // End of day
    for id in [first.id, opened.id] {
        let done = system.order_client.complete_order(id).await?;
        info!(order_id = %done.id, "Order completed");
    }
    let report = system.order_client.archive_completed().await?;
    for (id, e) in &report.failed {
        error!(order_id = %id, error = %e, "Order could not be archived");
    }
    info!(
        archived = report.archived.len(),
        free_carts = system.order_client.free_carts().await?.len(),
        "Day closed"
    );

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
