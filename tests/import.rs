//! Integration tests for bulk roster import.

use swiss_pairing_web::{import_roster, Tournament, TournamentError, DEFAULT_RATING};

#[test]
fn import_reads_name_team_rating() {
    let csv = "name,team,rating\nAlice,Red,1600\nBob,,1450\n";
    let roster = import_roster(csv.as_bytes(), &[]).unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].name, "Alice");
    assert_eq!(roster[0].team.as_deref(), Some("Red"));
    assert_eq!(roster[0].rating, 1600);
    assert_eq!(roster[1].team, None);
    assert!(roster.iter().all(|c| c.active));
}

#[test]
fn header_names_ignore_case() {
    let csv = "Name, TEAM ,Rating\nAlice,Red,1600\n";
    let roster = import_roster(csv.as_bytes(), &[]).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Alice");
    assert_eq!(roster[0].team.as_deref(), Some("Red"));
    assert_eq!(roster[0].rating, 1600);
}

#[test]
fn bad_rating_defaults_and_unknown_team_is_dropped() {
    let csv = "name,team,rating\n Carol , green , abc\nDave,BLUE,\nEve,Blue,  1333 \n";
    let known = vec!["Red".to_string(), "Blue".to_string()];
    let roster = import_roster(csv.as_bytes(), &known).unwrap();

    assert_eq!(roster[0].name, "Carol");
    assert_eq!(roster[0].team, None);
    assert_eq!(roster[0].rating, DEFAULT_RATING);
    assert_eq!(roster[1].team.as_deref(), Some("Blue"));
    assert_eq!(roster[1].rating, DEFAULT_RATING);
    assert_eq!(roster[2].rating, 1333);
}

#[test]
fn rows_without_name_or_columns_are_tolerated() {
    let csv = "name,team,rating\n,Red,1500\nFrank\n";
    let roster = import_roster(csv.as_bytes(), &[]).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Frank");
    assert_eq!(roster[0].team, None);
    assert_eq!(roster[0].rating, DEFAULT_RATING);
}

#[test]
fn malformed_csv_is_an_error() {
    let bytes: &[u8] = b"name,team,rating\n\xff\xfe,Red,1500\n";
    assert!(import_roster(bytes, &[]).is_err());
}

#[test]
fn tournament_import_skips_taken_names() {
    let mut t = Tournament::with_teams(vec!["Red".to_string()]);
    t.add_competitor("Alice", None, 1500).unwrap();
    let added = t
        .import_competitors("name,team,rating\nalice,Red,1\nGina,red,1700\nGina,,1200\n".as_bytes())
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(t.competitors.len(), 2);
    assert_eq!(t.competitors[1].team.as_deref(), Some("Red"));

    let err = t.import_competitors(&b"name,team\n\xff,Red\n"[..]).unwrap_err();
    assert!(matches!(err, TournamentError::Import(_)));
}
