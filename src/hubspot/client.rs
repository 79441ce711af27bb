use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::SyncError;
use crate::hubspot::models::{CreateInvoiceBody, RemoteObject, SearchResponse};
use crate::invoices::models::DetailedInvoice;
use crate::sync::InvoiceDirectory;

/// Thin client for the HubSpot CRM invoice object API.
///
/// Auth is a static API key attached to every call; each call is a single
/// blocking round-trip with a client-level timeout. No retries here —
/// retry policy belongs to the caller.
pub struct HubSpotClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HubSpotClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn objects_url(&self) -> String {
        format!("{}/crm/v3/objects/invoices", self.base_url)
    }
}

#[async_trait]
impl InvoiceDirectory for HubSpotClient {
    async fn find_by_invoice_id(&self, invoice_id: i64) -> Result<Option<String>, SyncError> {
        let lookup_err = |reason: String| SyncError::RemoteLookup { invoice_id, reason };

        let response = self
            .client
            .get(self.objects_url())
            .query(&[("hapikey", self.api_key.as_str())])
            .query(&[("id", invoice_id)])
            .send()
            .await
            .map_err(|err| lookup_err(err.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|err| lookup_err(err.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| lookup_err(format!("malformed search response: {}", err)))?;

        debug!(invoice_id, total = body.total, "remote search completed");

        if body.total > 0 {
            Ok(body.results.into_iter().next().map(|object| object.id))
        } else {
            Ok(None)
        }
    }

    async fn create(&self, invoice: &DetailedInvoice) -> Result<String, SyncError> {
        let create_err = |reason: String| SyncError::RemoteCreateFailed {
            invoice_id: invoice.id,
            reason,
        };

        let response = self
            .client
            .post(self.objects_url())
            .query(&[("hapikey", self.api_key.as_str())])
            .json(&CreateInvoiceBody::from(invoice))
            .send()
            .await
            .map_err(|err| create_err(err.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|err| create_err(err.to_string()))?;

        let created: RemoteObject = response
            .json()
            .await
            .map_err(|err| create_err(format!("malformed create response: {}", err)))?;

        Ok(created.id)
    }
}
