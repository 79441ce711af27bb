//! One-shot reconciliation run: pull local invoices, push the ones missing
//! remotely, log the report, exit. Exits non-zero only when the candidate
//! list cannot be obtained at all.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use invoice_sync::{
    bootstrap, config::Config, hubspot::HubSpotClient, invoices::InvoiceRepository,
    sync::Reconciler,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,invoice_sync=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenv::dotenv().ok();
    let config = Config::from_env().context("loading configuration")?;

    let pool = bootstrap::initialize_database(&config.database_url)
        .await
        .context("initializing database")?;

    let store = Arc::new(InvoiceRepository::new(pool));
    let directory = Arc::new(HubSpotClient::new(
        config.hubspot_base_url.clone(),
        config.hubspot_api_key.clone(),
        Duration::from_secs(config.remote_timeout_secs),
    ));

    let reconciler =
        Reconciler::new(store, directory).with_lookup_policy(config.lookup_failure_policy);

    let report = reconciler
        .run()
        .await
        .context("obtaining the invoice candidate list")?;

    let summary = report.summary();
    info!(
        run_id = %report.run_id,
        total = summary.total,
        skipped = summary.skipped,
        created = summary.created,
        failed = summary.failed,
        "invoice synchronization completed"
    );

    Ok(())
}
