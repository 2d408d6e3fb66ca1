use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::attendance::AttendanceRecord;

/// Set difference between the persisted and desired attendees of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceDiff {
    pub to_add: BTreeSet<i64>,
    pub to_remove: BTreeSet<i64>,
}

impl AttendanceDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute which player ids must be added and which removed so that
/// `current` becomes `desired`. The two result sets are always disjoint.
pub fn compute_diff(current: &BTreeSet<i64>, desired: &BTreeSet<i64>) -> AttendanceDiff {
    AttendanceDiff {
        to_add: desired.difference(current).copied().collect(),
        to_remove: current.difference(desired).copied().collect(),
    }
}

/// Concrete writes needed to bring one game's attendance to the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcilePlan {
    pub game_id: i64,
    /// Player ids that need a new attendance record.
    pub to_create: Vec<i64>,
    /// Existing records to delete.
    pub to_delete: Vec<AttendanceRecord>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    pub fn operation_count(&self) -> usize {
        self.to_create.len() + self.to_delete.len()
    }
}

/// Build the write plan for `game_id` from an unscoped attendance listing.
///
/// Records of other games are ignored. Every record of a removed player is
/// scheduled for deletion, so a pre-existing duplicate pair is cleared too.
pub fn plan(records: &[AttendanceRecord], game_id: i64, desired: &BTreeSet<i64>) -> ReconcilePlan {
    let current_records: Vec<&AttendanceRecord> =
        records.iter().filter(|r| r.game_id == game_id).collect();
    let current: BTreeSet<i64> = current_records.iter().map(|r| r.player_id).collect();

    let diff = compute_diff(&current, desired);

    let to_delete = current_records
        .into_iter()
        .filter(|r| diff.to_remove.contains(&r.player_id))
        .copied()
        .collect();

    ReconcilePlan {
        game_id,
        to_create: diff.to_add.into_iter().collect(),
        to_delete,
    }
}
