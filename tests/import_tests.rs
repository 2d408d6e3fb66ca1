use frequentium_lambda::error::ImportError;
use frequentium_lambda::import::parse_player_import;
use frequentium_lambda::model::player::NewPlayer;

#[test]
fn parses_both_spellings_and_numeric_registrations() {
    let json = r#"[
        { "nome": " Paulo Santos ", "matricula": "123460" },
        { "name": "Juliana Almeida", "registrationNumber": 123464 }
    ]"#;
    let players = parse_player_import(json).expect("import");
    assert_eq!(
        players,
        vec![
            NewPlayer { name: "Paulo Santos".to_string(), registration_number: "123460".to_string() },
            NewPlayer { name: "Juliana Almeida".to_string(), registration_number: "123464".to_string() },
        ]
    );
}

#[test]
fn keeps_first_entry_per_registration() {
    let json = r#"[
        { "nome": "Felipe Martins", "matricula": "123469" },
        { "nome": "Felipe M.", "matricula": "123469" },
        { "nome": "Mariana Souza", "matricula": "123470" }
    ]"#;
    let players = parse_player_import(json).expect("import");
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Felipe Martins");
}

#[test]
fn reports_entry_missing_a_field() {
    let json = r#"[
        { "nome": "Ricardo Lima", "matricula": "123467" },
        { "nome": "   ", "matricula": "123468" }
    ]"#;
    match parse_player_import(json) {
        Err(ImportError::MissingField { index, field }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "nome");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let json = r#"[{ "nome": "Daniela Pereira" }]"#;
    assert!(matches!(
        parse_player_import(json),
        Err(ImportError::MissingField { index: 0, field: "matricula" })
    ));
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(parse_player_import("{ not json"), Err(ImportError::Json(_))));
    assert!(matches!(parse_player_import(r#"{ "nome": "x" }"#), Err(ImportError::Json(_))));
    assert_eq!(parse_player_import("[]").expect("empty import").len(), 0);
}
