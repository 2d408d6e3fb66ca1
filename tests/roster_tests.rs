use chrono::NaiveDate;

use frequentium_lambda::model::attendance::AttendanceRecord;
use frequentium_lambda::model::game::{Game, GameDuration};
use frequentium_lambda::model::player::Player;
use frequentium_lambda::roster::{
    DEFAULT_PAGE_SIZE, attendance_sheet, game_has_attendance, most_recent_game, paginate,
    player_has_attendance, sort_games_newest_first, sort_players_by_name,
};

fn load_players() -> Vec<Player> {
    let json = std::fs::read_to_string("tests/sample_players.json").expect("players fixture");
    serde_json::from_str(&json).expect("players")
}

fn load_attendance() -> Vec<AttendanceRecord> {
    let json = std::fs::read_to_string("tests/sample_attendance.json").expect("attendance fixture");
    serde_json::from_str(&json).expect("attendance")
}

fn game(id: i64, y: i32, m: u32, d: u32) -> Game {
    Game {
        id,
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        duration: GameDuration::One,
    }
}

#[test]
fn sheet_joins_players_and_sorts_by_name() {
    let sheet = attendance_sheet(&load_attendance(), &load_players(), 10);

    // Record 103 points at a player that no longer exists
    let names: Vec<&str> = sheet.iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(names, vec!["Lucas Silva", "maria Oliveira"]);
    assert_eq!(sheet[0].record_id, 100);
    assert_eq!(sheet[1].registration_number, "123457");
}

#[test]
fn sheet_for_game_without_attendance_is_empty() {
    assert!(attendance_sheet(&load_attendance(), &load_players(), 12).is_empty());
}

#[test]
fn deletion_guards_look_at_any_reference() {
    let records = load_attendance();
    assert!(game_has_attendance(&records, 11));
    assert!(!game_has_attendance(&records, 12));
    assert!(player_has_attendance(&records, 2));
    assert!(!player_has_attendance(&records, 3));
}

#[test]
fn players_sort_case_insensitively() {
    let mut players = load_players();
    sort_players_by_name(&mut players);
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ana Rodrigues", "Carlos Souza", "Lucas Silva", "maria Oliveira"]);
}

#[test]
fn games_sort_newest_first_and_pick_most_recent() {
    let mut games = vec![game(1, 2025, 1, 8), game(2, 2025, 2, 5), game(3, 2025, 2, 5), game(4, 2024, 12, 30)];

    let recent = most_recent_game(&games).expect("non-empty");
    assert_eq!(recent.id, 3);

    sort_games_newest_first(&mut games);
    let order: Vec<i64> = games.iter().map(|g| g.id).collect();
    assert_eq!(order, vec![3, 2, 1, 4]);

    assert!(most_recent_game(&[]).is_none());
}

#[test]
fn paginates_one_based() {
    let items: Vec<u32> = (1..=23).collect();

    let first = paginate(&items, 1, DEFAULT_PAGE_SIZE);
    assert_eq!(first.items, &items[0..10]);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_items, 23);

    let last = paginate(&items, 3, DEFAULT_PAGE_SIZE);
    assert_eq!(last.items, &[21, 22, 23]);

    assert!(paginate(&items, 4, DEFAULT_PAGE_SIZE).items.is_empty());
    assert!(paginate(&items, 0, DEFAULT_PAGE_SIZE).items.is_empty());
    assert_eq!(paginate(&items, 2, 0).items, &[2]);

    let empty: Vec<u32> = Vec::new();
    let page = paginate(&empty, 1, DEFAULT_PAGE_SIZE);
    assert_eq!(page.total_pages, 0);
    assert!(page.items.is_empty());
}

#[test]
fn accented_names_sort_with_their_base_letter() {
    let player = |id: i64, name: &str| Player {
        id,
        name: name.to_string(),
        registration_number: format!("9000{id}"),
        hours_accumulated: 0,
    };
    let mut players = vec![player(1, "Zeca"), player(2, "Érica"), player(3, "Álvaro"), player(4, "bruno")];
    sort_players_by_name(&mut players);
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Álvaro", "bruno", "Érica", "Zeca"]);

    let records: Vec<AttendanceRecord> = players
        .iter()
        .map(|p| AttendanceRecord { id: 50 + p.id, game_id: 7, player_id: p.id })
        .collect();
    let sheet = attendance_sheet(&records, &players, 7);
    let names: Vec<&str> = sheet.iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(names, vec!["Álvaro", "bruno", "Érica", "Zeca"]);
}
