use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::server::AppState;
use crate::sync::{Reconciler, RunReport};

/// Trigger one reconciliation pass and return its report.
///
/// The pass itself never fails on per-record errors; only an unavailable
/// invoice store surfaces here (as 503).
pub async fn run_sync(State(state): State<AppState>) -> AppResult<Json<RunReport>> {
    let reconciler = Reconciler::new(state.invoices.clone(), state.hubspot.clone())
        .with_lookup_policy(state.lookup_policy);

    let report = reconciler.run().await?;
    Ok(Json(report))
}
