use serde::{Deserialize, Serialize};

/// Join row linking one player to one game (`/frequencia`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    #[serde(rename = "jogoId")]
    pub game_id: i64,
    #[serde(rename = "jogadorId")]
    pub player_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendance {
    #[serde(rename = "jogoId")]
    pub game_id: i64,
    #[serde(rename = "jogadorId")]
    pub player_id: i64,
}
