use std::{sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{
    config::Config, customers::CustomerRepository, error::AppResult, hubspot::HubSpotClient,
    invoices::InvoiceRepository, server::AppState,
};

pub async fn initialize_app_state(config: &Config) -> AppResult<AppState> {
    info!("Initializing application components ...");

    let pool = initialize_database(&config.database_url).await?;

    let invoices = Arc::new(InvoiceRepository::new(pool.clone()));
    let customers = Arc::new(CustomerRepository::new(pool.clone()));
    info!("Invoice and customer repositories initialized");

    let hubspot = Arc::new(HubSpotClient::new(
        config.hubspot_base_url.clone(),
        config.hubspot_api_key.clone(),
        Duration::from_secs(config.remote_timeout_secs),
    ));
    info!(
        base_url = %config.hubspot_base_url,
        policy = ?config.lookup_failure_policy,
        "HubSpot client initialized"
    );

    Ok(AppState {
        invoices,
        customers,
        hubspot,
        lookup_policy: config.lookup_failure_policy,
    })
}

pub async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized");
    Ok(pool)
}
