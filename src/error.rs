use thiserror::Error;

/// Failure of a single call against the attendance backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Backend responded with status {code}")]
    Status { code: u16 },
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Store task did not complete: {0}")]
    Task(String),
}

/// Outcome of a reconciliation that did not fully apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The current attendance could not be read; nothing was written.
    #[error("Failed to fetch current attendance: {0}")]
    Fetch(#[source] StoreError),
    /// Some writes failed. Writes that succeeded are left in place.
    #[error(
        "Attendance for game {game_id} only partially reconciled: {} add(s) and {} removal(s) failed",
        .failed_adds.len(),
        .failed_removes.len()
    )]
    PartialReconciliation {
        game_id: i64,
        /// Player ids whose attendance record could not be created.
        failed_adds: Vec<i64>,
        /// Attendance record ids that could not be deleted.
        failed_removes: Vec<i64>,
    },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Entry {index} is missing a value for `{field}`")]
    MissingField { index: usize, field: &'static str },
}
