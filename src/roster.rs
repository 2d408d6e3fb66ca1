use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::attendance::AttendanceRecord;
use crate::model::game::Game;
use crate::model::player::Player;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One line of a game's attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEntry {
    pub record_id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub registration_number: String,
}

/// Join the attendance of `game_id` with the player list.
///
/// Records pointing at players that no longer exist are skipped. Sorted by
/// name, ignoring case and accents, then by registration number.
pub fn attendance_sheet(records: &[AttendanceRecord], players: &[Player], game_id: i64) -> Vec<AttendanceEntry> {
    let by_id: HashMap<i64, &Player> = players.iter().map(|p| (p.id, p)).collect();
    let mut entries: Vec<AttendanceEntry> = records
        .iter()
        .filter(|r| r.game_id == game_id)
        .filter_map(|r| {
            by_id.get(&r.player_id).map(|p| AttendanceEntry {
                record_id: r.id,
                player_id: p.id,
                player_name: p.name.clone(),
                registration_number: p.registration_number.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| {
        compare_names(&a.player_name, &b.player_name)
            .then_with(|| a.registration_number.cmp(&b.registration_number))
    });
    entries
}

pub fn game_has_attendance(records: &[AttendanceRecord], game_id: i64) -> bool {
    records.iter().any(|r| r.game_id == game_id)
}

pub fn player_has_attendance(records: &[AttendanceRecord], player_id: i64) -> bool {
    records.iter().any(|r| r.player_id == player_id)
}

pub fn sort_players_by_name(players: &mut [Player]) {
    players.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
}

/// Newest date first; games on the same day are ordered by descending id.
pub fn sort_games_newest_first(games: &mut [Game]) {
    games.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}

/// The game preselected when recording attendance.
pub fn most_recent_game(games: &[Game]) -> Option<&Game> {
    games
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)))
}

// Accents and case are ignored, so "Álvaro" sorts next to "Alberto"
fn compare_names(a: &str, b: &str) -> Ordering {
    name_key(a).cmp(&name_key(b)).then_with(|| a.cmp(b))
}

fn name_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// A 1-based page of a client-side list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out page `page` (1-based). Page 0 or past the end is empty;
/// `per_page` of 0 is treated as 1.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let slice = if page == 0 {
        &items[..0]
    } else {
        let start = (page - 1).saturating_mul(per_page).min(total_items);
        let end = start.saturating_add(per_page).min(total_items);
        &items[start..end]
    };
    Page { items: slice, page, total_pages, total_items }
}
