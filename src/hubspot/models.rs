use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoices::models::DetailedInvoice;

/// Response from the invoice object search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub total: u32,
    #[serde(default)]
    pub results: Vec<RemoteObject>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteObject {
    pub id: String,
}

/// Body of the invoice object create call
#[derive(Debug, Serialize)]
pub struct CreateInvoiceBody {
    pub properties: InvoiceProperties,
}

#[derive(Debug, Serialize)]
pub struct InvoiceProperties {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub customer_name: String,
    pub customer_email: String,
}

impl From<&DetailedInvoice> for CreateInvoiceBody {
    fn from(invoice: &DetailedInvoice) -> Self {
        Self {
            properties: InvoiceProperties {
                invoice_id: invoice.id,
                customer_id: invoice.customer_id,
                amount: invoice.amount,
                date: invoice.date,
                customer_name: invoice.customer_name.clone(),
                customer_email: invoice.customer_email.clone(),
            },
        }
    }
}
