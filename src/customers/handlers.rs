use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::customers::models::Customer;
use crate::error::{AppError, AppResult};
use crate::server::AppState;

#[derive(Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = state.customers.list_customers().await?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let customer = state
        .customers
        .get_customer(customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {}", customer_id)))?;

    Ok(Json(customer))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CustomerRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    req.validate()
        .map_err(|err| AppError::InvalidInput(err.to_string()))?;

    let customer = state
        .customers
        .create_customer(&req.name, &req.email)
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
    Json(req): Json<CustomerRequest>,
) -> AppResult<Json<Customer>> {
    req.validate()
        .map_err(|err| AppError::InvalidInput(err.to_string()))?;

    let customer = state
        .customers
        .update_customer(customer_id, &req.name, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {}", customer_id)))?;

    Ok(Json(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> AppResult<StatusCode> {
    let deleted = state.customers.delete_customer(customer_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("customer {}", customer_id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
