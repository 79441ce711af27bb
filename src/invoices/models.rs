use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An invoice as stored locally, eligible for reconciliation.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub customer_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// An invoice joined with its customer, built just before a remote create.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, PartialEq)]
pub struct DetailedInvoice {
    pub id: i64,
    pub customer_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub customer_name: String,
    pub customer_email: String,
}
