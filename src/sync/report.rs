use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Result of reconciling one invoice.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// A matching record already exists remotely.
    Skipped { remote_id: String },
    /// The invoice was pushed and the remote assigned it an id.
    Created { remote_id: String },
    /// Enrichment or the remote create failed for this invoice.
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecordResult {
    pub invoice_id: i64,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

/// Counts per outcome for one pass.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: usize,
    pub skipped: usize,
    pub created: usize,
    pub failed: usize,
}

/// Ordered per-record results of one reconciliation pass.
///
/// Appended to while the pass runs, read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub results: Vec<RecordResult>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            results: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn record(&mut self, invoice_id: i64, outcome: RunOutcome) {
        self.summary.total += 1;
        match outcome {
            RunOutcome::Skipped { .. } => self.summary.skipped += 1,
            RunOutcome::Created { .. } => self.summary.created += 1,
            RunOutcome::Failed { .. } => self.summary.failed += 1,
        }
        self.results.push(RecordResult {
            invoice_id,
            outcome,
        });
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_match_results() {
        let mut report = RunReport::new();
        report.record(
            1,
            RunOutcome::Skipped {
                remote_id: "r1".to_string(),
            },
        );
        report.record(
            2,
            RunOutcome::Created {
                remote_id: "r2".to_string(),
            },
        );
        report.record(
            3,
            RunOutcome::Failed {
                reason: "boom".to_string(),
            },
        );
        report.record(
            4,
            RunOutcome::Failed {
                reason: "boom again".to_string(),
            },
        );
        report.finish();

        let summary = report.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(report.results.len(), 4);
        assert!(report.completed_at.is_some());
    }

    #[test]
    fn test_results_keep_processing_order() {
        let mut report = RunReport::new();
        for id in [7, 3, 9] {
            report.record(
                id,
                RunOutcome::Created {
                    remote_id: format!("r{}", id),
                },
            );
        }

        let ids: Vec<i64> = report.results.iter().map(|r| r.invoice_id).collect();
        assert_eq!(ids, vec![7, 3, 9]);
    }
}
