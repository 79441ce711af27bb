//! One-way reconciliation of locally stored invoices against HubSpot.
//!
//! A pass pulls every local invoice once, asks the remote directory whether
//! it already exists, and pushes the ones that are missing. Records are
//! processed strictly sequentially; one record's failure never aborts the
//! pass.

pub mod handlers;
pub mod reconciler;
pub mod report;

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::invoices::models::{DetailedInvoice, Invoice};

pub use reconciler::Reconciler;
pub use report::{RecordResult, RunOutcome, RunReport, RunSummary};

/// Read-only view of the local invoice store, as seen by the reconciler.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// All invoices eligible for reconciliation, in insertion order.
    async fn list_candidates(&self) -> Result<Vec<Invoice>, SyncError>;

    /// The customer-joined projection for one invoice.
    async fn detailed(&self, invoice_id: i64) -> Result<DetailedInvoice, SyncError>;
}

/// The remote system of record.
#[async_trait]
pub trait InvoiceDirectory: Send + Sync {
    /// Remote identifier of the record tagged with this local invoice id,
    /// if one exists. Transport and decode errors are surfaced; deciding
    /// what they mean is the caller's job.
    async fn find_by_invoice_id(&self, invoice_id: i64) -> Result<Option<String>, SyncError>;

    /// Submit the invoice as a new remote record, returning its remote id.
    /// Never retried internally.
    async fn create(&self, invoice: &DetailedInvoice) -> Result<String, SyncError>;
}

/// What the reconciler does when a remote lookup errors.
///
/// `FailOpen` treats the error as "no match" and proceeds to create, which
/// risks a duplicate write if the record was actually there. `FailClosed`
/// records a failed outcome for the record instead, which risks leaving it
/// unsynced. Either way the record is never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailurePolicy {
    #[default]
    FailOpen,
    FailClosed,
}

impl FromStr for LookupFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail_open" => Ok(LookupFailurePolicy::FailOpen),
            "fail_closed" => Ok(LookupFailurePolicy::FailClosed),
            other => Err(format!(
                "unknown lookup policy '{}' (expected fail_open or fail_closed)",
                other
            )),
        }
    }
}
