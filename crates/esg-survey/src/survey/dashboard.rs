use super::access::{AccessError, AdminGate};
use super::catalog::QuestionCatalog;
use super::scoring::{self, DashboardSummary};
use super::submission::Submission;
use crate::gateway::SubmissionGateway;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Admin view over the submission store. Only obtainable through [`AdminGate`].
///
/// The snapshot is replaced wholesale on every refresh and summaries are recomputed
/// from it on demand; there is no incremental state to fall out of sync.
#[derive(Debug)]
pub struct DashboardSession {
    gateway: Arc<dyn SubmissionGateway>,
    catalog: Arc<QuestionCatalog>,
    snapshot: Vec<Submission>,
    fetched_at: Option<DateTime<Utc>>,
    degraded: bool,
}

impl DashboardSession {
    pub fn open(
        gate: &AdminGate,
        attempt: &str,
        gateway: Arc<dyn SubmissionGateway>,
        catalog: Arc<QuestionCatalog>,
    ) -> Result<Self, AccessError> {
        gate.unlock(attempt)?;
        Ok(Self {
            gateway,
            catalog,
            snapshot: Vec::new(),
            fetched_at: None,
            degraded: false,
        })
    }

    /// Replaces the snapshot with whatever the gateway returns now. A failed fetch
    /// leaves an empty snapshot and marks the session degraded.
    pub async fn refresh(&mut self) -> &[Submission] {
        match self.gateway.fetch().await {
            Ok(submissions) => {
                info!(records = submissions.len(), "dashboard snapshot refreshed");
                self.snapshot = submissions;
                self.degraded = false;
            }
            Err(err) => {
                warn!(error = %err, "dashboard fetch failed; showing empty snapshot");
                self.snapshot = Vec::new();
                self.degraded = true;
            }
        }
        self.fetched_at = Some(Utc::now());
        &self.snapshot
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn summary(&self) -> DashboardSummary {
        scoring::summarize(&self.snapshot, &self.catalog)
    }
}
