use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scheduled game session (`/jogos`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    #[serde(rename = "data", with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(rename = "duracao")]
    pub duration: GameDuration,
}

impl Game {
    /// Date as shown on the dashboard, e.g. `05/03/2025`.
    pub fn label(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

/// Body for `POST /jogos` and `PUT /jogos/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    #[serde(rename = "data", with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(rename = "duracao")]
    pub duration: GameDuration,
}

/// Session length in hours. The backend only accepts 1, 2 or 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameDuration {
    One = 1,
    Two = 2,
    Three = 3,
}

impl GameDuration {
    pub fn hours(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GameDuration {
    type Error = String;

    fn try_from(hours: u8) -> Result<Self, Self::Error> {
        match hours {
            1 => Ok(GameDuration::One),
            2 => Ok(GameDuration::Two),
            3 => Ok(GameDuration::Three),
            other => Err(format!("invalid game duration {other}, expected 1, 2 or 3 hours")),
        }
    }
}

impl From<GameDuration> for u8 {
    fn from(duration: GameDuration) -> Self {
        duration.hours()
    }
}

/// Extract the calendar date from a stored value, ignoring any time-of-day.
///
/// Accepts `YYYY-MM-DD` as well as timestamps such as `2025-03-05T00:00:00.000Z`.
/// The date is taken as written; no timezone conversion is applied, so a
/// midnight UTC timestamp never slides to the previous day.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw
        .trim()
        .split(['T', ' '])
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
}

pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .map_err(|e| serde::de::Error::custom(format!("invalid game date {raw:?}: {e}")))
    }
}
