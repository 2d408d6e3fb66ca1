use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::diff::{self, ReconcilePlan};
use crate::error::{ReconcileError, StoreError};
use crate::model::attendance::AttendanceRecord;
use crate::store::{AttendanceStore, run_blocking};

/// Writes applied by one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub game_id: i64,
    pub created: Vec<AttendanceRecord>,
    /// Ids of the attendance records that are gone after the run.
    pub removed: Vec<i64>,
}

impl ReconcileReport {
    fn empty(game_id: i64) -> Self {
        Self { game_id, ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Notified after a run that changed a game's attendance, so views derived
/// from it (player hours, attendance sheets) can refresh.
pub trait AttendanceListener: Send + Sync {
    fn attendance_changed(&self, report: &ReconcileReport);
}

impl<F> AttendanceListener for F
where
    F: Fn(&ReconcileReport) + Send + Sync,
{
    fn attendance_changed(&self, report: &ReconcileReport) {
        self(report)
    }
}

/// Makes a game's stored attendance match a desired set of players.
pub struct Reconciler {
    store: Arc<dyn AttendanceStore>,
    listeners: Vec<Box<dyn AttendanceListener>>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self { store, listeners: Vec::new() }
    }

    /// Register a listener called after every run that applied at least one write.
    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: AttendanceListener + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Fetch the current attendance and return the writes a reconciliation
    /// would issue, without issuing them.
    #[instrument(level = "info", skip(self, desired))]
    pub async fn preview<I>(&self, game_id: i64, desired: I) -> Result<ReconcilePlan, ReconcileError>
    where
        I: IntoIterator<Item = i64>,
    {
        let desired: BTreeSet<i64> = desired.into_iter().collect();
        let records = self.fetch_attendance().await.map_err(|e| {
            error!(error = %e, game_id, "Failed to fetch attendance; no writes issued");
            ReconcileError::Fetch(e)
        })?;
        let plan = diff::plan(&records, game_id, &desired);
        info!(
            game_id,
            fetched = records.len(),
            creates = plan.to_create.len(),
            deletes = plan.to_delete.len(),
            "Computed attendance plan"
        );
        Ok(plan)
    }

    /// Re-fetch the attendance of `game_id`, diff it against `desired` and
    /// apply the minimal set of creates and deletes concurrently.
    ///
    /// Safe to re-run after a partial failure: the fresh diff only touches
    /// what is still mismatched.
    pub async fn reconcile_attendance<I>(&self, game_id: i64, desired: I) -> Result<ReconcileReport, ReconcileError>
    where
        I: IntoIterator<Item = i64>,
    {
        let plan = self.preview(game_id, desired).await?;
        self.apply(&plan).await
    }

    /// Issue every write in `plan` at once and wait for all of them to settle.
    ///
    /// Failures are collected rather than short-circuiting the batch. A delete
    /// of a record that no longer exists counts as done.
    #[instrument(level = "info", skip(self, plan), fields(game_id = plan.game_id))]
    pub async fn apply(&self, plan: &ReconcilePlan) -> Result<ReconcileReport, ReconcileError> {
        let game_id = plan.game_id;
        if plan.is_empty() {
            info!(game_id, "Attendance already up to date");
            return Ok(ReconcileReport::empty(game_id));
        }

        // Spawn everything before awaiting anything so the writes overlap.
        let deletes: Vec<(i64, JoinHandle<Result<(), StoreError>>)> = plan
            .to_delete
            .iter()
            .map(|record| {
                let store = Arc::clone(&self.store);
                let record_id = record.id;
                (record_id, tokio::task::spawn_blocking(move || store.delete_attendance(record_id)))
            })
            .collect();
        let creates: Vec<(i64, JoinHandle<Result<AttendanceRecord, StoreError>>)> = plan
            .to_create
            .iter()
            .map(|&player_id| {
                let store = Arc::clone(&self.store);
                (player_id, tokio::task::spawn_blocking(move || store.create_attendance(game_id, player_id)))
            })
            .collect();

        let mut report = ReconcileReport::empty(game_id);
        let mut failed_adds: Vec<i64> = Vec::new();
        let mut failed_removes: Vec<i64> = Vec::new();

        for (record_id, handle) in deletes {
            match handle.await {
                Ok(Ok(())) => report.removed.push(record_id),
                Ok(Err(StoreError::NotFound(_))) => {
                    warn!(record_id, "Attendance record already absent");
                    report.removed.push(record_id);
                }
                Ok(Err(e)) => {
                    error!(error = %e, record_id, "Failed to delete attendance record");
                    failed_removes.push(record_id);
                }
                Err(e) => {
                    error!(error = %e, record_id, "Delete task join error");
                    failed_removes.push(record_id);
                }
            }
        }

        for (player_id, handle) in creates {
            match handle.await {
                Ok(Ok(record)) => report.created.push(record),
                Ok(Err(e)) => {
                    error!(error = %e, player_id, "Failed to create attendance record");
                    failed_adds.push(player_id);
                }
                Err(e) => {
                    error!(error = %e, player_id, "Create task join error");
                    failed_adds.push(player_id);
                }
            }
        }

        info!(
            game_id,
            created = report.created.len(),
            removed = report.removed.len(),
            failed_adds = failed_adds.len(),
            failed_removes = failed_removes.len(),
            "Attendance writes settled"
        );

        if !report.is_empty() {
            for listener in &self.listeners {
                listener.attendance_changed(&report);
            }
        }

        if failed_adds.is_empty() && failed_removes.is_empty() {
            Ok(report)
        } else {
            Err(ReconcileError::PartialReconciliation { game_id, failed_adds, failed_removes })
        }
    }

    async fn fetch_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let store = Arc::clone(&self.store);
        run_blocking(move || store.list_attendance()).await
    }
}
