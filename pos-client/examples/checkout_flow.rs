//! Minimal checkout walkthrough against a running POS service.
//!
//! Point POS_BASE_URL at the service (default http://localhost:8080):
//!
//! ```sh
//! POS_BASE_URL=http://localhost:8080 cargo run -p pos-client --example checkout_flow
//! ```

use anyhow::{Context, bail};
use pos_client::{Catalog, ClientConfig, DetailForm, DetailSync, OrderSession};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pos_client=debug".into()),
        )
        .init();

    let base_url =
        std::env::var("POS_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let config = ClientConfig::new(base_url).with_debounce(Duration::from_millis(600));
    let api = config.build_api()?;

    let mut catalog = Catalog::new();
    catalog.reload(&api, false).await.context("loading catalog")?;
    let Some(item) = catalog.items().first().cloned() else {
        bail!("catalog is empty, seed some items first");
    };
    println!("catalog: {} items, first: {} @ {}", catalog.items().len(), item.name, item.price);

    let session = Arc::new(OrderSession::new(api));
    let sync = DetailSync::new(Arc::clone(&session), config.debounce);

    let order = session.ensure_order().await?;
    println!("invoice {} started", order.invoice_number.as_deref().unwrap_or(&order.id));

    let order = session.add_item(&item).await?;
    println!("subtotal {} tax {} total {}", order.subtotal, order.tax, order.total);

    let mut details = DetailForm::from_order(&order);
    details.customer_name = "Walk-in".to_string();
    sync.queue(&details).await?;
    tokio::time::sleep(config.debounce + Duration::from_millis(200)).await;

    let paid = session.checkout().await?;
    println!(
        "paid: fiscal invoice {}",
        paid.fiscal_invoice_number.as_deref().unwrap_or("(none)")
    );
    Ok(())
}
