use serde::{Deserialize, Serialize};

/// A registered player as returned by `/jogadores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(rename = "matricula", alias = "registrationNumber")]
    pub registration_number: String,
    // Incremented server-side as attendance is recorded
    #[serde(rename = "horas", alias = "hoursAccumulated", default)]
    pub hours_accumulated: u32,
}

/// Body for `POST /jogadores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "matricula")]
    pub registration_number: String,
}

/// Body for `PUT /jogadores/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "matricula")]
    pub registration_number: String,
    #[serde(rename = "horas")]
    pub hours_accumulated: u32,
}

impl From<&Player> for PlayerUpdate {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            registration_number: player.registration_number.clone(),
            hours_accumulated: player.hours_accumulated,
        }
    }
}
