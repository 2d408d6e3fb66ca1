use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::ApiConfig;
use crate::error::StoreError;
use crate::frequentium::FrequentiumApi;
use crate::import::parse_player_import;
use crate::reconciler::{ReconcileReport, Reconciler};
use crate::roster;
use crate::store::{AttendanceStore, run_blocking};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Dry run: reads happen, writes are only planned.
    Test,
    Production,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Workflow {
    Reconcile {
        game_id: i64,
        #[serde(default)]
        player_ids: Vec<i64>,
    },
    Attendance {
        game_id: i64,
    },
    DeleteGame {
        game_id: i64,
    },
    DeletePlayer {
        player_id: i64,
    },
    ImportPlayers {
        players: serde_json::Value,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub mode: Mode,
    /// Overrides `FREQUENTIUM_API_URL` for this invocation.
    #[serde(default)]
    pub api_base_url: Option<String>,
    pub workflow: Workflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let payload = event.payload;

    let config = ApiConfig::from_env().with_base_url_override(payload.api_base_url.as_deref());
    info!(base_url = %config.base_url, mode = ?payload.mode, "Handling request");

    let api = Arc::new(FrequentiumApi::new(config));
    Ok(run_workflow(api, payload.mode, payload.workflow).await)
}

/// Execute one workflow against the backend and summarise the outcome.
pub async fn run_workflow(api: Arc<FrequentiumApi>, mode: Mode, workflow: Workflow) -> Response {
    match workflow {
        Workflow::Reconcile { game_id, player_ids } => reconcile(api, mode, game_id, player_ids).await,
        Workflow::Attendance { game_id } => attendance(api, game_id).await,
        Workflow::DeleteGame { game_id } => delete_game(api, mode, game_id).await,
        Workflow::DeletePlayer { player_id } => delete_player(api, mode, player_id).await,
        Workflow::ImportPlayers { players } => import_players(api, mode, players).await,
    }
}

async fn reconcile(api: Arc<FrequentiumApi>, mode: Mode, game_id: i64, player_ids: Vec<i64>) -> Response {
    // Player hours are derived from attendance, so any applied change invalidates them
    let reconciler = Reconciler::new(api).with_listener(|report: &ReconcileReport| {
        info!(
            game_id = report.game_id,
            created = report.created.len(),
            removed = report.removed.len(),
            "Attendance changed; player hours need refresh"
        );
    });

    match mode {
        Mode::Test => match reconciler.preview(game_id, player_ids).await {
            Ok(plan) => Response::ok(format!(
                "Dry run for game {}: would create {} and delete {} attendance record(s)",
                game_id,
                plan.to_create.len(),
                plan.to_delete.len()
            )),
            Err(e) => Response::failed(e.to_string()),
        },
        Mode::Production => match reconciler.reconcile_attendance(game_id, player_ids).await {
            Ok(report) if report.is_empty() => {
                Response::ok(format!("Attendance for game {game_id} already up to date"))
            }
            Ok(report) => Response::ok(format!(
                "Attendance for game {}: {} created, {} removed",
                game_id,
                report.created.len(),
                report.removed.len()
            )),
            Err(e) => {
                error!(error = %e, game_id, "Reconciliation did not complete");
                Response::failed(e.to_string())
            }
        },
    }
}

async fn attendance(api: Arc<FrequentiumApi>, game_id: i64) -> Response {
    // Players and attendance are fetched side by side
    let players_api = Arc::clone(&api);
    let players = tokio::spawn(run_blocking(move || players_api.list_players()));
    let records = run_blocking(move || api.list_attendance_for_game(game_id)).await;
    let players = match players.await {
        Ok(result) => result,
        Err(e) => Err(StoreError::Task(e.to_string())),
    };

    match (records, players) {
        (Ok(records), Ok(players)) => {
            let sheet = roster::attendance_sheet(&records, &players, game_id);
            if sheet.is_empty() {
                return Response::ok(format!("No attendance recorded for game {game_id}"));
            }
            let names: Vec<String> = sheet
                .iter()
                .map(|e| format!("{} - {}", e.player_name, e.registration_number))
                .collect();
            Response::ok(format!(
                "Game {} has {} player(s) present: {}",
                game_id,
                sheet.len(),
                names.join("; ")
            ))
        }
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, game_id, "Failed to load attendance sheet");
            Response::failed(format!("Failed to load attendance: {e}"))
        }
    }
}

async fn delete_game(api: Arc<FrequentiumApi>, mode: Mode, game_id: i64) -> Response {
    let result = match mode {
        Mode::Test => run_blocking(move || {
            let records = api.list_attendance_for_game(game_id)?;
            if roster::game_has_attendance(&records, game_id) {
                return Err(StoreError::Conflict(format!(
                    "game {game_id} has attendance records and cannot be deleted"
                )));
            }
            Ok(())
        })
        .await,
        Mode::Production => run_blocking(move || api.delete_game_guarded(game_id)).await,
    };
    match (result, mode) {
        (Ok(()), Mode::Test) => Response::ok(format!("Game {game_id} can be deleted")),
        (Ok(()), Mode::Production) => Response::ok(format!("Game {game_id} deleted")),
        (Err(e), _) => Response::failed(e.to_string()),
    }
}

async fn delete_player(api: Arc<FrequentiumApi>, mode: Mode, player_id: i64) -> Response {
    let result = match mode {
        Mode::Test => run_blocking(move || {
            let records = api.list_attendance()?;
            if roster::player_has_attendance(&records, player_id) {
                return Err(StoreError::Conflict(format!(
                    "player {player_id} has attendance records and cannot be deleted"
                )));
            }
            Ok(())
        })
        .await,
        Mode::Production => run_blocking(move || api.delete_player_guarded(player_id)).await,
    };
    match (result, mode) {
        (Ok(()), Mode::Test) => Response::ok(format!("Player {player_id} can be deleted")),
        (Ok(()), Mode::Production) => Response::ok(format!("Player {player_id} deleted")),
        (Err(e), _) => Response::failed(e.to_string()),
    }
}

async fn import_players(api: Arc<FrequentiumApi>, mode: Mode, players: serde_json::Value) -> Response {
    let parsed = match parse_player_import(&players.to_string()) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(error = %e, "Rejected player import");
            return Response::failed(e.to_string());
        }
    };

    if mode == Mode::Test {
        return Response::ok(format!("Dry run: {} player(s) ready to import", parsed.len()));
    }

    let mut handles = Vec::with_capacity(parsed.len());
    for player in parsed {
        let api = Arc::clone(&api);
        let registration = player.registration_number.clone();
        handles.push((registration, tokio::task::spawn_blocking(move || api.create_player(&player))));
    }

    let mut created = 0usize;
    let mut failures: Vec<String> = Vec::new();
    for (registration, handle) in handles {
        match handle.await {
            Ok(Ok(_)) => created += 1,
            Ok(Err(e)) => {
                error!(error = %e, registration = %registration, "Failed to import player");
                failures.push(registration);
            }
            Err(e) => {
                error!(error = %e, registration = %registration, "Import task join error");
                failures.push(registration);
            }
        }
    }

    if failures.is_empty() {
        Response::ok(format!("Imported {created} player(s)"))
    } else {
        Response::failed(format!(
            "Imported {} player(s); failed: {}",
            created,
            failures.join(", ")
        ))
    }
}
