use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::ImportError;
use crate::model::player::NewPlayer;

#[derive(Debug, Deserialize)]
struct ImportEntry {
    #[serde(alias = "nome", default)]
    name: Option<Value>,
    #[serde(rename = "registrationNumber", alias = "matricula", default)]
    registration_number: Option<Value>,
}

/// Parse a player import file: a JSON array of `{nome|name, matricula|registrationNumber}`.
///
/// Registration numbers may be strings or numbers. Later entries repeating a
/// registration number already seen are dropped.
pub fn parse_player_import(json: &str) -> Result<Vec<NewPlayer>, ImportError> {
    let entries: Vec<ImportEntry> = serde_json::from_str(json)?;
    let total = entries.len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut players: Vec<NewPlayer> = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
        let name = text(entry.name).ok_or(ImportError::MissingField { index, field: "nome" })?;
        let registration_number = text(entry.registration_number)
            .ok_or(ImportError::MissingField { index, field: "matricula" })?;
        if seen.insert(registration_number.clone()) {
            players.push(NewPlayer { name, registration_number });
        }
    }

    info!(total, unique = players.len(), "Parsed player import");
    Ok(players)
}

fn text(value: Option<Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}
