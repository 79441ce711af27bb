use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{AppResult, SyncError};
use crate::invoices::models::{DetailedInvoice, Invoice};
use crate::sync::InvoiceStore;

/// Read/write access to locally stored invoices.
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All invoices in insertion order.
    pub async fn list_invoices(&self) -> AppResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, amount, date
            FROM invoices
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn get_invoice(&self, invoice_id: i64) -> AppResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, amount, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn create_invoice(
        &self,
        customer_id: i64,
        amount: Decimal,
        date: NaiveDate,
    ) -> AppResult<Invoice> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (customer_id, amount, date)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, amount, date
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Invoice joined with its customer. `None` covers both a missing
    /// invoice and a missing customer row.
    pub async fn get_detailed_invoice(&self, invoice_id: i64) -> AppResult<Option<DetailedInvoice>> {
        let detailed = sqlx::query_as::<_, DetailedInvoice>(
            r#"
            SELECT i.id, i.customer_id, i.amount, i.date,
                   c.name AS customer_name, c.email AS customer_email
            FROM invoices i
            JOIN customers c ON i.customer_id = c.id
            WHERE i.id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detailed)
    }
}

#[async_trait]
impl InvoiceStore for InvoiceRepository {
    async fn list_candidates(&self) -> Result<Vec<Invoice>, SyncError> {
        self.list_invoices()
            .await
            .map_err(|err| SyncError::StoreUnavailable(err.to_string()))
    }

    async fn detailed(&self, invoice_id: i64) -> Result<DetailedInvoice, SyncError> {
        match self.get_detailed_invoice(invoice_id).await {
            Ok(Some(detailed)) => Ok(detailed),
            Ok(None) => Err(SyncError::RecordNotFound(invoice_id)),
            Err(err) => Err(SyncError::StoreUnavailable(err.to_string())),
        }
    }
}
