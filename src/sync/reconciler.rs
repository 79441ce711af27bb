use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::SyncError;
use crate::invoices::models::Invoice;
use crate::sync::report::{RunOutcome, RunReport};
use crate::sync::{InvoiceDirectory, InvoiceStore, LookupFailurePolicy};

/// Runs one pull→check→enrich→push pass over the local invoice store.
///
/// Dependencies are injected so tests can substitute in-memory fakes for
/// both the store and the remote directory.
pub struct Reconciler {
    store: Arc<dyn InvoiceStore>,
    directory: Arc<dyn InvoiceDirectory>,
    lookup_policy: LookupFailurePolicy,
}

impl Reconciler {
    pub fn new(store: Arc<dyn InvoiceStore>, directory: Arc<dyn InvoiceDirectory>) -> Self {
        Self {
            store,
            directory,
            lookup_policy: LookupFailurePolicy::default(),
        }
    }

    pub fn with_lookup_policy(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// Run one reconciliation pass to completion.
    ///
    /// Only a failure to obtain the candidate list aborts the pass; every
    /// per-record error is captured in the report and processing continues
    /// with the next invoice. Each record's effects are durable before the
    /// next record begins, so an interrupted pass is safe to re-run.
    pub async fn run(&self) -> Result<RunReport, SyncError> {
        let candidates = self.store.list_candidates().await?;

        let mut report = RunReport::new();
        info!(
            run_id = %report.run_id,
            candidates = candidates.len(),
            "starting invoice reconciliation pass"
        );

        for invoice in &candidates {
            let outcome = self.reconcile_one(invoice).await;
            match &outcome {
                RunOutcome::Skipped { remote_id } => {
                    info!(invoice_id = invoice.id, remote_id = %remote_id, "already synced, skipping");
                }
                RunOutcome::Created { remote_id } => {
                    info!(invoice_id = invoice.id, remote_id = %remote_id, "pushed to remote");
                }
                RunOutcome::Failed { reason } => {
                    error!(invoice_id = invoice.id, %reason, "reconciliation failed for invoice");
                }
            }
            report.record(invoice.id, outcome);
        }

        report.finish();
        let summary = report.summary();
        info!(
            run_id = %report.run_id,
            skipped = summary.skipped,
            created = summary.created,
            failed = summary.failed,
            "reconciliation pass completed"
        );

        Ok(report)
    }

    async fn reconcile_one(&self, invoice: &Invoice) -> RunOutcome {
        let existing = match self.directory.find_by_invoice_id(invoice.id).await {
            Ok(existing) => existing,
            Err(err) => match self.lookup_policy {
                // Indistinguishable from "not yet synced"; err toward
                // re-attempting the create rather than dropping the record.
                LookupFailurePolicy::FailOpen => {
                    warn!(invoice_id = invoice.id, error = %err, "remote lookup failed, treating as no match");
                    None
                }
                LookupFailurePolicy::FailClosed => {
                    return RunOutcome::Failed {
                        reason: err.to_string(),
                    };
                }
            },
        };

        if let Some(remote_id) = existing {
            return RunOutcome::Skipped { remote_id };
        }

        let detailed = match self.store.detailed(invoice.id).await {
            Ok(detailed) => detailed,
            Err(err) => {
                return RunOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };

        match self.directory.create(&detailed).await {
            Ok(remote_id) => RunOutcome::Created { remote_id },
            Err(err) => RunOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoices::models::DetailedInvoice;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    fn invoice(id: i64) -> Invoice {
        Invoice {
            id,
            customer_id: 100 + id,
            amount: dec!(125.50),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        }
    }

    fn detailed(id: i64) -> DetailedInvoice {
        DetailedInvoice {
            id,
            customer_id: 100 + id,
            amount: dec!(125.50),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            customer_name: format!("Customer {}", id),
            customer_email: format!("customer{}@example.com", id),
        }
    }

    struct FakeStore {
        candidates: Result<Vec<Invoice>, String>,
        // Ids for which the customer join yields no row
        missing_details: Vec<i64>,
    }

    impl FakeStore {
        fn with_invoices(ids: &[i64]) -> Self {
            Self {
                candidates: Ok(ids.iter().map(|id| invoice(*id)).collect()),
                missing_details: Vec::new(),
            }
        }

        fn unavailable(reason: &str) -> Self {
            Self {
                candidates: Err(reason.to_string()),
                missing_details: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl InvoiceStore for FakeStore {
        async fn list_candidates(&self) -> Result<Vec<Invoice>, SyncError> {
            match &self.candidates {
                Ok(invoices) => Ok(invoices.clone()),
                Err(reason) => Err(SyncError::StoreUnavailable(reason.clone())),
            }
        }

        async fn detailed(&self, invoice_id: i64) -> Result<DetailedInvoice, SyncError> {
            if self.missing_details.contains(&invoice_id) {
                return Err(SyncError::RecordNotFound(invoice_id));
            }
            Ok(detailed(invoice_id))
        }
    }

    #[derive(Default)]
    struct FakeDirectory {
        // Records already present remotely, local id -> remote id
        remote: Mutex<HashMap<i64, String>>,
        // Ids for which the search call errors
        lookup_errors: Vec<i64>,
        // Ids for which the create call errors
        create_errors: Vec<i64>,
        create_calls: AtomicUsize,
    }

    impl FakeDirectory {
        fn with_remote(ids: &[i64]) -> Self {
            let remote = ids
                .iter()
                .map(|id| (*id, format!("hs-{}", id)))
                .collect::<HashMap<_, _>>();
            Self {
                remote: Mutex::new(remote),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl InvoiceDirectory for FakeDirectory {
        async fn find_by_invoice_id(&self, invoice_id: i64) -> Result<Option<String>, SyncError> {
            if self.lookup_errors.contains(&invoice_id) {
                return Err(SyncError::RemoteLookup {
                    invoice_id,
                    reason: "connection reset".to_string(),
                });
            }
            Ok(self.remote.lock().await.get(&invoice_id).cloned())
        }

        async fn create(&self, invoice: &DetailedInvoice) -> Result<String, SyncError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.create_errors.contains(&invoice.id) {
                return Err(SyncError::RemoteCreateFailed {
                    invoice_id: invoice.id,
                    reason: "502 Bad Gateway".to_string(),
                });
            }
            let remote_id = format!("hs-{}", invoice.id);
            self.remote
                .lock()
                .await
                .insert(invoice.id, remote_id.clone());
            Ok(remote_id)
        }
    }

    fn reconciler(store: FakeStore, directory: FakeDirectory) -> (Reconciler, Arc<FakeDirectory>) {
        let directory = Arc::new(directory);
        let reconciler = Reconciler::new(Arc::new(store), directory.clone());
        (reconciler, directory)
    }

    #[tokio::test]
    async fn test_already_matched_records_are_skipped_without_create() {
        let store = FakeStore::with_invoices(&[1, 2]);
        let directory = FakeDirectory::with_remote(&[1, 2]);
        let (reconciler, directory) = reconciler(store, directory);

        let report = reconciler.run().await.unwrap();

        assert_eq!(report.summary().skipped, 2);
        assert_eq!(report.summary().created, 0);
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mixed_pass_reports_in_order() {
        // Remote already has 1; create succeeds for 2 and fails for 3.
        let store = FakeStore::with_invoices(&[1, 2, 3]);
        let directory = FakeDirectory {
            create_errors: vec![3],
            ..FakeDirectory::with_remote(&[1])
        };
        let (reconciler, _) = reconciler(store, directory);

        let report = reconciler.run().await.unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(
            report.results[0].outcome,
            RunOutcome::Skipped {
                remote_id: "hs-1".to_string()
            }
        );
        assert_eq!(
            report.results[1].outcome,
            RunOutcome::Created {
                remote_id: "hs-2".to_string()
            }
        );
        match &report.results[2].outcome {
            RunOutcome::Failed { reason } => {
                assert!(reason.contains("remote create failed"), "got: {}", reason)
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_run_converges_to_all_skipped() {
        let directory = Arc::new(FakeDirectory::default());
        let first = Reconciler::new(
            Arc::new(FakeStore::with_invoices(&[1, 2, 3])),
            directory.clone(),
        );
        let report = first.run().await.unwrap();
        assert_eq!(report.summary().created, 3);

        let second = Reconciler::new(
            Arc::new(FakeStore::with_invoices(&[1, 2, 3])),
            directory.clone(),
        );
        let report = second.run().await.unwrap();

        assert_eq!(report.summary().skipped, 3);
        assert_eq!(report.summary().created, 0);
        // No duplicate writes on the re-run
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_lookup_error_fails_open_and_still_creates() {
        let store = FakeStore::with_invoices(&[5]);
        let directory = FakeDirectory {
            lookup_errors: vec![5],
            ..Default::default()
        };
        let (reconciler, directory) = reconciler(store, directory);

        let report = reconciler.run().await.unwrap();

        assert_eq!(
            report.results[0].outcome,
            RunOutcome::Created {
                remote_id: "hs-5".to_string()
            }
        );
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_error_fails_closed_when_configured() {
        let store = FakeStore::with_invoices(&[5]);
        let directory = FakeDirectory {
            lookup_errors: vec![5],
            ..Default::default()
        };
        let directory = Arc::new(directory);
        let reconciler = Reconciler::new(Arc::new(store), directory.clone())
            .with_lookup_policy(LookupFailurePolicy::FailClosed);

        let report = reconciler.run().await.unwrap();

        match &report.results[0].outcome {
            RunOutcome::Failed { reason } => {
                assert!(reason.contains("remote lookup failed"), "got: {}", reason)
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
        // Fail-closed never attempts the create
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_detail_does_not_block_later_records() {
        let store = FakeStore {
            missing_details: vec![1],
            ..FakeStore::with_invoices(&[1, 2])
        };
        let (reconciler, _) = reconciler(store, FakeDirectory::default());

        let report = reconciler.run().await.unwrap();

        match &report.results[0].outcome {
            RunOutcome::Failed { reason } => {
                assert!(reason.contains("no detailed row"), "got: {}", reason)
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
        assert_eq!(
            report.results[1].outcome,
            RunOutcome::Created {
                remote_id: "hs-2".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_store_unavailable_aborts_with_no_report() {
        let store = FakeStore::unavailable("connection refused");
        let (reconciler, directory) = reconciler(store, FakeDirectory::default());

        let err = reconciler.run().await.unwrap_err();

        assert!(matches!(err, SyncError::StoreUnavailable(_)));
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failures_still_complete_the_pass() {
        let store = FakeStore::with_invoices(&[1, 2]);
        let directory = FakeDirectory {
            create_errors: vec![1, 2],
            ..Default::default()
        };
        let (reconciler, _) = reconciler(store, directory);

        let report = reconciler.run().await.unwrap();

        assert_eq!(report.summary().failed, 2);
        assert!(report.completed_at.is_some());
    }
}
