use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::invoices::models::Invoice;
use crate::server::AppState;

#[derive(Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(range(min = 1))]
    pub customer_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}

pub async fn list_invoices(State(state): State<AppState>) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = state.invoices.list_invoices().await?;
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> AppResult<Json<Invoice>> {
    let invoice = state
        .invoices
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("invoice {}", invoice_id)))?;

    Ok(Json(invoice))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(req): Json<CreateInvoiceRequest>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    req.validate()
        .map_err(|err| AppError::InvalidInput(err.to_string()))?;

    if req.amount <= Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "amount must be positive".to_string(),
        ));
    }

    // Reject invoices for customers we do not know about
    let customer = state.customers.get_customer(req.customer_id).await?;
    if customer.is_none() {
        return Err(AppError::InvalidInput(format!(
            "customer {} does not exist",
            req.customer_id
        )));
    }

    let invoice = state
        .invoices
        .create_invoice(req.customer_id, req.amount, req.date)
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}
