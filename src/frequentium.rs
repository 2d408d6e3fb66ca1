use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info, info_span, instrument};
use ureq::Agent;

use crate::config::ApiConfig;
use crate::error::StoreError;
use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::model::game::{Game, GameDetails};
use crate::model::player::{NewPlayer, Player, PlayerUpdate};
use crate::store::AttendanceStore;

/// Blocking client for the Frequentium REST backend
/// (`/jogadores`, `/jogos`, `/frequencia`).
#[derive(Clone)]
pub struct FrequentiumApi {
    config: ApiConfig,
    agent: Agent,
}

impl fmt::Debug for FrequentiumApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequentiumApi")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("server_side_game_filter", &self.config.server_side_game_filter)
            .finish()
    }
}

impl FrequentiumApi {
    pub fn new(config: ApiConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build()
            .into();
        Self { config, agent }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // Players

    pub fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        self.get_json("jogadores")
    }

    pub fn get_player(&self, id: i64) -> Result<Player, StoreError> {
        self.get_json(&format!("jogadores/{id}"))
    }

    pub fn create_player(&self, player: &NewPlayer) -> Result<Player, StoreError> {
        self.post_json("jogadores", player)
    }

    pub fn update_player(&self, id: i64, update: &PlayerUpdate) -> Result<Player, StoreError> {
        self.put_json(&format!("jogadores/{id}"), update)
    }

    pub fn delete_player(&self, id: i64) -> Result<(), StoreError> {
        self.delete(&format!("jogadores/{id}"))
    }

    /// Delete a player only if no attendance record references them.
    #[instrument(level = "info", skip(self))]
    pub fn delete_player_guarded(&self, id: i64) -> Result<(), StoreError> {
        let attended = self.list_attendance()?.iter().any(|r| r.player_id == id);
        if attended {
            info!(player_id = id, "Refusing to delete player with attendance records");
            return Err(StoreError::Conflict(format!(
                "player {id} has attendance records and cannot be deleted"
            )));
        }
        self.delete_player(id)
    }

    // Games

    pub fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        self.get_json("jogos")
    }

    pub fn get_game(&self, id: i64) -> Result<Game, StoreError> {
        self.get_json(&format!("jogos/{id}"))
    }

    pub fn create_game(&self, details: &GameDetails) -> Result<Game, StoreError> {
        self.post_json("jogos", details)
    }

    pub fn update_game(&self, id: i64, details: &GameDetails) -> Result<Game, StoreError> {
        self.put_json(&format!("jogos/{id}"), details)
    }

    pub fn delete_game(&self, id: i64) -> Result<(), StoreError> {
        self.delete(&format!("jogos/{id}"))
    }

    /// Delete a game only if nobody is recorded as attending it.
    #[instrument(level = "info", skip(self))]
    pub fn delete_game_guarded(&self, id: i64) -> Result<(), StoreError> {
        if !self.list_attendance_for_game(id)?.is_empty() {
            info!(game_id = id, "Refusing to delete game with attendance records");
            return Err(StoreError::Conflict(format!(
                "game {id} has attendance records and cannot be deleted"
            )));
        }
        self.delete_game(id)
    }

    // Transport

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let url = self.config.url(path);
        let response_result = {
            let _span = info_span!("frequentium_get", url = %url).entered();
            self.agent.get(&url).call()
        };
        match response_result {
            Ok(response) => Self::read_json(response, &url),
            Err(e) => Err(Self::classify(e, &url)),
        }
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, StoreError> {
        let url = self.config.url(path);
        let response_result = {
            let _span = info_span!("frequentium_post", url = %url).entered();
            self.agent.post(&url).send_json(body)
        };
        match response_result {
            Ok(response) => Self::read_json(response, &url),
            Err(e) => Err(Self::classify(e, &url)),
        }
    }

    fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, StoreError> {
        let url = self.config.url(path);
        let response_result = {
            let _span = info_span!("frequentium_put", url = %url).entered();
            self.agent.put(&url).send_json(body)
        };
        match response_result {
            Ok(response) => Self::read_json(response, &url),
            Err(e) => Err(Self::classify(e, &url)),
        }
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        let url = self.config.url(path);
        let response_result = {
            let _span = info_span!("frequentium_delete", url = %url).entered();
            self.agent.delete(&url).call()
        };
        match response_result {
            Ok(response) => {
                info!(status = response.status().as_u16(), url = %url, "Deleted resource");
                Ok(())
            }
            Err(e) => Err(Self::classify(e, &url)),
        }
    }

    fn read_json<T: DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
        url: &str,
    ) -> Result<T, StoreError> {
        let mut body_reader = response.into_body();
        let body = body_reader.read_to_string().map_err(|e| {
            error!(error = %e, url = %url, "Failed to read response body");
            StoreError::Transport(format!("Failed to read response body: {e}"))
        })?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            error!(error = %e, url = %url, bytes = body.len(), "Failed to deserialize response");
            StoreError::Decode(e.to_string())
        })
    }

    fn classify(e: ureq::Error, url: &str) -> StoreError {
        match e {
            ureq::Error::StatusCode(404) => StoreError::NotFound(url.to_string()),
            ureq::Error::StatusCode(409) => StoreError::Conflict(url.to_string()),
            ureq::Error::StatusCode(code) => {
                error!(status = code, url = %url, "Backend returned error status");
                StoreError::Status { code }
            }
            other => {
                error!(error = %other, url = %url, "Request failed");
                StoreError::Transport(other.to_string())
            }
        }
    }
}

impl AttendanceStore for FrequentiumApi {
    fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.get_json("frequencia")
    }

    fn create_attendance(&self, game_id: i64, player_id: i64) -> Result<AttendanceRecord, StoreError> {
        self.post_json("frequencia", &NewAttendance { game_id, player_id })
    }

    fn delete_attendance(&self, record_id: i64) -> Result<(), StoreError> {
        self.delete(&format!("frequencia/{record_id}"))
    }

    fn list_attendance_for_game(&self, game_id: i64) -> Result<Vec<AttendanceRecord>, StoreError> {
        if self.config.server_side_game_filter {
            return self.get_json(&format!("frequencia/jogo/{game_id}"));
        }
        Ok(self
            .list_attendance()?
            .into_iter()
            .filter(|r| r.game_id == game_id)
            .collect())
    }
}
