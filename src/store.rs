use std::collections::HashSet;

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::model::attendance::AttendanceRecord;

/// The attendance join resource the reconciler writes to.
///
/// Calls are blocking; async callers run them on the blocking pool.
pub trait AttendanceStore: Send + Sync {
    /// Every attendance record, across all games.
    fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError>;

    fn create_attendance(&self, game_id: i64, player_id: i64) -> Result<AttendanceRecord, StoreError>;

    /// Remove a record. Unknown ids yield `StoreError::NotFound`.
    fn delete_attendance(&self, record_id: i64) -> Result<(), StoreError>;

    /// Attendance of a single game. Filters the unscoped listing unless an
    /// implementation has a cheaper way.
    fn list_attendance_for_game(&self, game_id: i64) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self
            .list_attendance()?
            .into_iter()
            .filter(|r| r.game_id == game_id)
            .collect())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<AttendanceRecord>,
    next_id: i64,
    fail_list: bool,
    fail_create_for: HashSet<i64>,
    fail_delete_for: HashSet<i64>,
    create_calls: usize,
    delete_calls: usize,
}

/// In-process attendance store with failure injection.
///
/// Behaves like the backend: ids are assigned in increasing order, a second
/// record for the same `(game, player)` pair is refused with a conflict and
/// deleting an unknown id is `NotFound`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with `(game_id, player_id)` pairs, assigning fresh ids.
    pub fn with_attendance(pairs: &[(i64, i64)]) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock();
            for &(game_id, player_id) in pairs {
                state.next_id += 1;
                let id = state.next_id;
                state.records.push(AttendanceRecord { id, game_id, player_id });
            }
        }
        store
    }

    /// Make every subsequent `list_attendance` call fail.
    pub fn fail_listing(&self, fail: bool) {
        self.state.lock().fail_list = fail;
    }

    /// Make creation fail for the given player id until cleared.
    pub fn fail_create_for(&self, player_id: i64) {
        self.state.lock().fail_create_for.insert(player_id);
    }

    /// Make deletion fail for the given record id until cleared.
    pub fn fail_delete_for(&self, record_id: i64) {
        self.state.lock().fail_delete_for.insert(record_id);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.fail_list = false;
        state.fail_create_for.clear();
        state.fail_delete_for.clear();
    }

    /// Snapshot of all stored records.
    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.state.lock().records.clone()
    }

    /// Number of create calls received, successful or not.
    pub fn create_calls(&self) -> usize {
        self.state.lock().create_calls
    }

    /// Number of delete calls received, successful or not.
    pub fn delete_calls(&self) -> usize {
        self.state.lock().delete_calls
    }

    pub fn reset_counters(&self) {
        let mut state = self.state.lock();
        state.create_calls = 0;
        state.delete_calls = 0;
    }
}

impl AttendanceStore for MemoryStore {
    fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let state = self.state.lock();
        if state.fail_list {
            return Err(StoreError::Transport("injected listing failure".to_string()));
        }
        Ok(state.records.clone())
    }

    fn create_attendance(&self, game_id: i64, player_id: i64) -> Result<AttendanceRecord, StoreError> {
        let mut state = self.state.lock();
        state.create_calls += 1;
        if state.fail_create_for.contains(&player_id) {
            return Err(StoreError::Status { code: 500 });
        }
        if state
            .records
            .iter()
            .any(|r| r.game_id == game_id && r.player_id == player_id)
        {
            return Err(StoreError::Conflict(format!(
                "player {player_id} already attends game {game_id}"
            )));
        }
        state.next_id += 1;
        let record = AttendanceRecord { id: state.next_id, game_id, player_id };
        state.records.push(record);
        Ok(record)
    }

    fn delete_attendance(&self, record_id: i64) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.delete_calls += 1;
        if state.fail_delete_for.contains(&record_id) {
            return Err(StoreError::Status { code: 500 });
        }
        let before = state.records.len();
        state.records.retain(|r| r.id != record_id);
        if state.records.len() == before {
            return Err(StoreError::NotFound(format!("attendance record {record_id}")));
        }
        Ok(())
    }
}

/// Run a blocking store call on the blocking pool and flatten join failures
/// into `StoreError::Task`.
pub async fn run_blocking<T, F>(call: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(result) => result,
        Err(e) => Err(StoreError::Task(e.to_string())),
    }
}
