use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::customers::handlers::{
    create_customer, delete_customer, get_customer, list_customers, update_customer,
};
use crate::customers::CustomerRepository;
use crate::hubspot::HubSpotClient;
use crate::invoices::handlers::{create_invoice, get_invoice, list_invoices};
use crate::invoices::InvoiceRepository;
use crate::sync::handlers::run_sync;
use crate::sync::LookupFailurePolicy;

#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<InvoiceRepository>,
    pub customers: Arc<CustomerRepository>,
    pub hubspot: Arc<HubSpotClient>,
    pub lookup_policy: LookupFailurePolicy,
}

async fn health_check() -> &'static str {
    "ok"
}

pub fn create_app(state: AppState) -> Router {
    info!("Setting up HTTP routes...");

    let app = Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/v1",
            Router::new()
                .route("/customers", get(list_customers).post(create_customer))
                .route(
                    "/customers/:id",
                    get(get_customer)
                        .put(update_customer)
                        .delete(delete_customer),
                )
                .route("/invoices", get(list_invoices).post(create_invoice))
                .route("/invoices/:id", get(get_invoice))
                .route("/sync/run", post(run_sync)),
        )
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("HTTP routes configured");
    app
}

pub async fn run_server(app: Router, bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Server listening on: {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
