//! Tests for the event-file processing API

use retrosheet::config::RetrosheetConfig;
use retrosheet::event::processor::{
    available_formats, decipher_file, process_file, process_records, write_table, write_tables,
    OutputFormat, ProcessingError, Table,
};
use retrosheet::event::records::read_records;
use retrosheet::event::DiagnosticKind;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("events")
        .join(name)
}

#[test]
fn test_available_formats() {
    let formats = available_formats();
    assert_eq!(formats.len(), 2);
    assert!(formats.contains(&OutputFormat::Csv));
    assert!(formats.contains(&OutputFormat::Json));
}

#[test]
fn test_csv_output() {
    let (output, _) = process_file(
        fixture_path("2024TST.EVN"),
        &RetrosheetConfig::default(),
        OutputFormat::Csv,
    )
    .unwrap();

    insta::assert_snapshot!(output, @r###"
    order,game_id,inning,side,pitcher_id,pitch_count,batter_id,count,pitches,play,B,1,2,3,H,runs,outs,visitor_score,home_score
    0,TST202404010,1,0,homep001,3,lead0001,12,CBX,S9/G,1,1,0,0,0,0,0,0,0
    1,TST202404010,1,0,homep001,5,vis00002,01,BX,64(1)3/GDP,0,0,0,0,0,0,2,0,0
    2,TST202404010,1,0,homep001,6,vis00003,00,1X,HR/F7,1,0,0,0,1,1,2,1,0
    3,TST202404010,1,0,homep001,9,vis00004,02,CS*S,K,0,0,0,0,0,1,3,1,0
    4,TST202404010,1,1,visip001,4,home0001,30,BBBB,W,1,1,0,0,0,0,0,1,0
    6,TST202404010,1,1,relif001,2,home0002,01,B.CX,HR/F8.1-H,1,0,0,0,2,2,0,1,2
    0,TST202404020,1,0,,1,vis00001,00,X,ZZ9,0,0,0,0,0,0,0,0,0
    "###);
}

#[test]
fn test_diagnostics_are_collected_not_fatal() {
    let (_, diagnostics) = process_file(
        fixture_path("2024TST.EVN"),
        &RetrosheetConfig::default(),
        OutputFormat::Csv,
    )
    .unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownPlayCode);
    insta::assert_snapshot!(
        diagnostics[0].to_string(),
        @"warning [unknown-play-code] game TST202404020 inning 1 [ZZ9]: unknown play code 'ZZ9' in play 'ZZ9'"
    );
}

#[test]
fn test_json_output() {
    let (output, _) = process_file(
        fixture_path("2024TST.EVN"),
        &RetrosheetConfig::default(),
        OutputFormat::Json,
    )
    .unwrap();

    let rows: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[5]["play"], "HR/F8.1-H");
    assert_eq!(rows[5]["order"], 6);
    assert_eq!(rows[5]["H"], 2);
    assert_eq!(rows[5]["home_score"], 2);
    assert_eq!(rows[5]["pitcher_id"], "relif001");
}

#[test]
fn test_sequential_matches_parallel() {
    let content = fs::read(fixture_path("2024TST.EVN")).unwrap();

    let mut config = RetrosheetConfig::default();
    let parallel = process_records(read_records(content.as_slice()).unwrap(), &config);
    config.processing.parallel = false;
    let sequential = process_records(read_records(content.as_slice()).unwrap(), &config);

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.len(), 2);
    assert_eq!(parallel[0].game_id, "TST202404010");
}

#[test]
fn test_ignored_pitch_characters_are_configurable() {
    let content = fs::read(fixture_path("2024TST.EVN")).unwrap();
    let mut config = RetrosheetConfig::default();
    config.pitches.ignored = String::new();

    let runs = process_records(read_records(content.as_slice()).unwrap(), &config);
    // "1X" now counts both characters, "CS*S" all four
    assert_eq!(runs[0].plays[2].pitch_count, 7);
    assert_eq!(runs[0].plays[3].pitch_count, 11);
}

#[test]
fn test_invalid_row_abandons_only_its_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("BAD.EVN");
    fs::write(
        &path,
        "id,AAA202404010\nplay,1,2,x,00,X,S9\nid,BBB202404010\nplay,1,0,y,00,X,S9\n",
    )
    .unwrap();

    let (output, diagnostics) =
        process_file(&path, &RetrosheetConfig::default(), OutputFormat::Csv).unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("0,BBB202404010,1,0,"), "{}", lines[1]);
    assert!(!output.contains("AAA202404010"));

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::InvalidRecord);
    insta::assert_snapshot!(
        diagnostics[0].to_string(),
        @"error [invalid-record] game AAA202404010: invalid record on line 2: expected team side 0 or 1, found '2'"
    );

    let runs = decipher_file(&path, &RetrosheetConfig::default()).unwrap();
    assert!(runs[0].abandoned);
    assert!(!runs[1].abandoned);
}

#[test]
fn test_game_tables() {
    let runs = decipher_file(fixture_path("2024TST.EVN"), &RetrosheetConfig::default()).unwrap();

    let info = write_table(&runs, Table::Info, OutputFormat::Csv).unwrap();
    insta::assert_snapshot!(info, @r###"
    game_id,key,value
    TST202404010,visteam,AAA
    TST202404010,hometeam,TST
    TST202404010,date,2024/04/01
    "###);

    let subs = write_table(&runs, Table::Subs, OutputFormat::Csv).unwrap();
    insta::assert_snapshot!(subs, @r###"
    order,game_id,version,player_id,player_name,side,batting_order,position
    5,TST202404010,2,relif001,Ray Lief,0,0,1
    "###);

    let comments = write_table(&runs, Table::Comments, OutputFormat::Csv).unwrap();
    insta::assert_snapshot!(comments, @r###"
    order,game_id,version,comment
    3,TST202404010,2,Long drive to left
    "###);

    let er = write_table(&runs, Table::Er, OutputFormat::Csv).unwrap();
    insta::assert_snapshot!(er, @r###"
    game_id,version,kind,player_id,value
    TST202404010,2,er,visip001,2
    "###);

    assert_eq!(runs[0].starting.len(), 4);
    assert_eq!(runs[0].starting[1].player_name, "Lee Dor");
    assert_eq!(runs[0].starting[1].position, 8);
}

#[test]
fn test_table_is_configurable() {
    let mut config = RetrosheetConfig::default();
    config.output.table = Table::Starting;
    let (output, _) = process_file(fixture_path("2024TST.EVN"), &config, OutputFormat::Json).unwrap();

    let rows: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["player_id"], "visip001");
    assert_eq!(rows[2]["side"], "1");
}

#[test]
fn test_write_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let runs = decipher_file(fixture_path("2024TST.EVN"), &RetrosheetConfig::default()).unwrap();

    let written = write_tables(&runs, dir.path(), OutputFormat::Csv).unwrap();
    assert_eq!(written.len(), 6);
    let plays = fs::read_to_string(dir.path().join("plays.csv")).unwrap();
    assert_eq!(plays.lines().count(), 8);
    let starting = fs::read_to_string(dir.path().join("starting.csv")).unwrap();
    assert!(starting.contains("Hank Home"));
}

#[test]
fn test_missing_file() {
    let result = process_file(
        fixture_path("missing.EVN"),
        &RetrosheetConfig::default(),
        OutputFormat::Csv,
    );
    assert!(matches!(result, Err(ProcessingError::FileNotFound(_))));
}
