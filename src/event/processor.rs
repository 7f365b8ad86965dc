//! File processing API for event files
//!
//! Drives the decipher over whole event files: records are grouped into
//! games, each game is run through its own [`GameState`], and the resulting
//! tables (plays, info, lineups, substitutions, comments and earned runs) are
//! written as CSV or JSON lines.
//!
//! A row that cannot be read abandons only the game it belongs to.
//!
//! Games are independent, so [`process_records`] runs them in parallel with
//! rayon when configured to. Plays within one game are always applied in file
//! order.
//!
//! ```rust,ignore
//! use retrosheet::event::processor::{process_file, OutputFormat};
//! use retrosheet::config::RetrosheetConfig;
//!
//! let config = RetrosheetConfig::default();
//! let output = process_file("2017ANA.EVA", &config, OutputFormat::Csv)?;
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::RetrosheetConfig;
use crate::event::diagnostics::{DecipherError, Diagnostic};
use crate::event::game::{GameState, PlayContext, PlayReport};
use crate::event::pitches::PitchCounter;
use crate::event::records::{read_records, Record, RecordRow};
use crate::event::resolver::BattingResult;

/// Errors that can occur during processing
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("invalid output format: {0}")]
    InvalidFormat(String),

    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("invalid record on line {line}: {detail}")]
    InvalidRecord { line: u64, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ProcessingError {
    /// The event-file line a row error refers to
    pub fn line(&self) -> Option<u64> {
        match self {
            ProcessingError::InvalidRecord { line, .. } => Some(*line),
            ProcessingError::Csv(e) => e.position().map(|p| p.line()),
            _ => None,
        }
    }
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn from_string(format: &str) -> Result<Self, ProcessingError> {
        match format.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ProcessingError::InvalidFormat(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "one play per row with a header line",
            OutputFormat::Json => "one JSON object per play (JSON lines)",
        }
    }
}

/// Get all available output formats
pub fn available_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Csv, OutputFormat::Json]
}

/// One output row per play
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayRow {
    pub order: usize,
    pub game_id: String,
    pub inning: u8,
    /// 0 when the visitor bats, 1 for the home team
    pub side: &'static str,
    pub pitcher_id: String,
    pub pitch_count: u32,
    pub batter_id: String,
    pub count: String,
    pub pitches: String,
    pub play: String,
    /// The batter reached base safely
    #[serde(rename = "B")]
    pub batter: u8,
    #[serde(rename = "1")]
    pub first: u8,
    #[serde(rename = "2")]
    pub second: u8,
    #[serde(rename = "3")]
    pub third: u8,
    /// Runners who crossed the plate on this play
    #[serde(rename = "H")]
    pub home: u8,
    /// Runs of the batting side so far this half-inning
    pub runs: u32,
    /// Outs in the half-inning after the play
    pub outs: u8,
    pub visitor_score: u32,
    pub home_score: u32,
}

impl PlayRow {
    fn new(
        order: usize,
        game_id: &str,
        context: &PlayContext,
        raw: &str,
        report: &PlayReport,
    ) -> Self {
        let outcome = &report.outcome;
        let after = &outcome.base_state_after;
        let reached = matches!(outcome.batting_result, Some(BattingResult::Reached(_)));
        PlayRow {
            order,
            game_id: game_id.to_string(),
            inning: report.inning,
            side: report.batting.code(),
            pitcher_id: report.pitcher.clone().unwrap_or_default(),
            pitch_count: report.pitch_count,
            batter_id: context.batter.clone(),
            count: context.count.clone(),
            pitches: context.pitches.clone(),
            play: raw.to_string(),
            batter: u8::from(reached),
            first: u8::from(after.first),
            second: u8::from(after.second),
            third: u8::from(after.third),
            home: outcome.runs_scored,
            runs: report.half_runs,
            outs: report.bases_before.outs() + outcome.outs_added,
            visitor_score: report.score.visitor,
            home_score: report.score.home,
        }
    }
}

/// One `info` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRow {
    pub game_id: String,
    pub key: String,
    pub value: String,
}

/// One `start` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartingRow {
    pub game_id: String,
    pub version: String,
    pub player_id: String,
    pub player_name: String,
    pub side: &'static str,
    pub batting_order: u8,
    pub position: u8,
}

/// One `sub` row, numbered in the same sequence as the plays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubRow {
    pub order: usize,
    pub game_id: String,
    pub version: String,
    pub player_id: String,
    pub player_name: String,
    pub side: &'static str,
    pub batting_order: u8,
    pub position: u8,
}

/// One `com` row. Takes the order of the play that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRow {
    pub order: usize,
    pub game_id: String,
    pub version: String,
    pub comment: String,
}

/// One `data` row, usually `er` (earned runs charged to a pitcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarnedRunRow {
    pub game_id: String,
    pub version: String,
    pub kind: String,
    pub player_id: String,
    pub value: String,
}

/// The output tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Plays,
    Info,
    Starting,
    Subs,
    Comments,
    Er,
}

impl Table {
    pub fn from_string(table: &str) -> Result<Self, ProcessingError> {
        match table.trim().to_ascii_lowercase().as_str() {
            "plays" => Ok(Table::Plays),
            "info" => Ok(Table::Info),
            "starting" => Ok(Table::Starting),
            "subs" => Ok(Table::Subs),
            "comments" => Ok(Table::Comments),
            "er" => Ok(Table::Er),
            other => Err(ProcessingError::InvalidTable(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::Plays => "plays",
            Table::Info => "info",
            Table::Starting => "starting",
            Table::Subs => "subs",
            Table::Comments => "comments",
            Table::Er => "er",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Table::Plays => "one row per play with the base state after it",
            Table::Info => "game information (teams, date, site, ...)",
            Table::Starting => "starting lineups",
            Table::Subs => "substitutions, numbered with the plays",
            Table::Comments => "comments, numbered with the plays",
            Table::Er => "earned runs and other data rows",
        }
    }
}

/// Get all output tables
pub fn available_tables() -> Vec<Table> {
    vec![
        Table::Plays,
        Table::Info,
        Table::Starting,
        Table::Subs,
        Table::Comments,
        Table::Er,
    ]
}

/// The records of one game, from its `id` row to the next
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecords {
    pub game_id: String,
    pub records: Vec<Record>,
    /// Rows of this game that could not be read
    pub invalid: Vec<Diagnostic>,
}

/// The deciphered tables of one game
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameRun {
    pub game_id: String,
    /// Set when a row of the game could not be read. Its tables are empty.
    pub abandoned: bool,
    pub plays: Vec<PlayRow>,
    pub info: Vec<InfoRow>,
    pub starting: Vec<StartingRow>,
    pub subs: Vec<SubRow>,
    pub comments: Vec<CommentRow>,
    pub er: Vec<EarnedRunRow>,
    pub diagnostics: Vec<Diagnostic>,
}

fn invalid_row(err: ProcessingError) -> Diagnostic {
    let line = err.line().unwrap_or(0);
    let detail = match err {
        ProcessingError::InvalidRecord { detail, .. } => detail,
        other => other.to_string(),
    };
    DecipherError::InvalidRecord { line, detail }.into()
}

/// Group rows into games. Rows before the first `id` row are dropped.
pub fn split_games(rows: Vec<RecordRow>) -> Vec<GameRecords> {
    let mut games: Vec<GameRecords> = Vec::new();
    for row in rows {
        match row {
            Ok(Record::Id(game_id)) => games.push(GameRecords {
                game_id,
                records: Vec::new(),
                invalid: Vec::new(),
            }),
            Ok(other) => match games.last_mut() {
                Some(game) => game.records.push(other),
                None => log::debug!("dropping record outside any game: {:?}", other),
            },
            Err(err) => match games.last_mut() {
                Some(game) => {
                    let diagnostic = invalid_row(err).with_game(game.game_id.clone());
                    game.invalid.push(diagnostic);
                }
                None => log::warn!("dropping invalid row outside any game: {}", err),
            },
        }
    }
    games
}

/// Run one game's records through a fresh game state.
///
/// A game with unreadable rows is not run. It comes back abandoned, with
/// one diagnostic per bad row.
pub fn run_game(game: &GameRecords, counter: &PitchCounter) -> GameRun {
    if !game.invalid.is_empty() {
        log::warn!(
            "game {}: abandoned, {} invalid rows",
            game.game_id,
            game.invalid.len()
        );
        return GameRun {
            game_id: game.game_id.clone(),
            abandoned: true,
            diagnostics: game.invalid.clone(),
            ..GameRun::default()
        };
    }

    let mut state = GameState::new(game.game_id.clone()).with_pitch_counter(counter.clone());
    let mut run = GameRun {
        game_id: game.game_id.clone(),
        ..GameRun::default()
    };
    let game_id = game.game_id.as_str();
    let mut version = String::new();
    // Plays and substitutions share one sequence
    let mut order = 0;

    for record in &game.records {
        match record {
            Record::Version(v) => version = v.clone(),
            Record::Info { key, value } => run.info.push(InfoRow {
                game_id: game_id.to_string(),
                key: key.clone(),
                value: value.clone(),
            }),
            Record::Start(appearance) => {
                if appearance.is_pitcher() {
                    state.install_pitcher(appearance.side, appearance.player_id.clone());
                }
                run.starting.push(StartingRow {
                    game_id: game_id.to_string(),
                    version: version.clone(),
                    player_id: appearance.player_id.clone(),
                    player_name: appearance.name.clone(),
                    side: appearance.side.code(),
                    batting_order: appearance.batting_order,
                    position: appearance.position,
                });
            }
            Record::Sub(appearance) => {
                if appearance.is_pitcher() {
                    state.install_pitcher(appearance.side, appearance.player_id.clone());
                }
                run.subs.push(SubRow {
                    order,
                    game_id: game_id.to_string(),
                    version: version.clone(),
                    player_id: appearance.player_id.clone(),
                    player_name: appearance.name.clone(),
                    side: appearance.side.code(),
                    batting_order: appearance.batting_order,
                    position: appearance.position,
                });
                order += 1;
            }
            Record::Play(play) => {
                let context = PlayContext::new(play.inning, play.side)
                    .with_batter(play.batter.clone())
                    .with_count(play.count.clone())
                    .with_pitches(play.pitches.clone());
                let report = state.apply_mut(&play.event, &context);
                run.plays
                    .push(PlayRow::new(order, game_id, &context, &play.event, &report));
                run.diagnostics.extend(report.diagnostics);
                order += 1;
            }
            Record::Comment(comment) => run.comments.push(CommentRow {
                order,
                game_id: game_id.to_string(),
                version: version.clone(),
                comment: comment.clone(),
            }),
            Record::Data { kind, values } => run.er.push(EarnedRunRow {
                game_id: game_id.to_string(),
                version: version.clone(),
                kind: kind.clone(),
                player_id: values.first().cloned().unwrap_or_default(),
                value: values.get(1).cloned().unwrap_or_default(),
            }),
            Record::Id(_) => {}
            Record::Other { kind, .. } => {
                log::trace!("game {}: skipping '{}' row", game_id, kind)
            }
        }
    }

    log::debug!(
        "game {}: {} plays, final score {}, {} diagnostics",
        game_id,
        run.plays.len(),
        state.score(),
        run.diagnostics.len()
    );
    run
}

/// Run every game in `rows`, in file order.
pub fn process_records(rows: Vec<RecordRow>, config: &RetrosheetConfig) -> Vec<GameRun> {
    let games = split_games(rows);
    let counter = PitchCounter::new(config.pitches.ignored.clone());

    if config.processing.parallel {
        games.par_iter().map(|game| run_game(game, &counter)).collect()
    } else {
        games.iter().map(|game| run_game(game, &counter)).collect()
    }
}

/// Serialise rows in the given format
pub fn write_rows<'a, T, I>(rows: I, format: OutputFormat) -> Result<String, ProcessingError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| ProcessingError::Io(e.into_error()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        OutputFormat::Json => {
            let mut output = String::new();
            for row in rows {
                output.push_str(&serde_json::to_string(row)?);
                output.push('\n');
            }
            Ok(output)
        }
    }
}

/// Serialise one table across every game of a run
pub fn write_table(
    runs: &[GameRun],
    table: Table,
    format: OutputFormat,
) -> Result<String, ProcessingError> {
    match table {
        Table::Plays => write_rows(runs.iter().flat_map(|run| run.plays.iter()), format),
        Table::Info => write_rows(runs.iter().flat_map(|run| run.info.iter()), format),
        Table::Starting => write_rows(runs.iter().flat_map(|run| run.starting.iter()), format),
        Table::Subs => write_rows(runs.iter().flat_map(|run| run.subs.iter()), format),
        Table::Comments => write_rows(runs.iter().flat_map(|run| run.comments.iter()), format),
        Table::Er => write_rows(runs.iter().flat_map(|run| run.er.iter()), format),
    }
}

/// Write every table into `dir` as `<table>.csv` or `<table>.json`
pub fn write_tables<P: AsRef<Path>>(
    runs: &[GameRun],
    dir: P,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, ProcessingError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for table in available_tables() {
        let path = dir.join(format!("{}.{}", table.name(), format.name()));
        fs::write(&path, write_table(runs, table, format)?)?;
        written.push(path);
    }
    Ok(written)
}

/// Decipher every game of an event file
pub fn decipher_file<P: AsRef<Path>>(
    file_path: P,
    config: &RetrosheetConfig,
) -> Result<Vec<GameRun>, ProcessingError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(ProcessingError::FileNotFound(
            file_path.display().to_string(),
        ));
    }

    let content = fs::read(file_path)?;
    let runs = process_records(read_records(content.as_slice())?, config);

    let plays: usize = runs.iter().map(|run| run.plays.len()).sum();
    let abandoned = runs.iter().filter(|run| run.abandoned).count();
    log::info!(
        "{}: {} games ({} abandoned), {} plays",
        file_path.display(),
        runs.len(),
        abandoned,
        plays
    );
    Ok(runs)
}

/// Collect the diagnostics of every game, in file order
pub fn collect_diagnostics(runs: &[GameRun]) -> Vec<Diagnostic> {
    runs.iter()
        .flat_map(|run| run.diagnostics.iter().cloned())
        .collect()
}

/// Decipher an event file and render the configured table
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    config: &RetrosheetConfig,
    format: OutputFormat,
) -> Result<(String, Vec<Diagnostic>), ProcessingError> {
    let runs = decipher_file(file_path, config)?;
    let output = write_table(&runs, config.output.table, format)?;
    Ok((output, collect_diagnostics(&runs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::records::parse_line;

    fn records(lines: &[&str]) -> Vec<RecordRow> {
        lines.iter().map(|line| parse_line(line)).collect()
    }

    #[test]
    fn test_output_format_from_string() {
        assert_eq!(OutputFormat::from_string("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_string("json").unwrap(), OutputFormat::Json);
        assert!(matches!(
            OutputFormat::from_string("xml"),
            Err(ProcessingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_table_from_string() {
        assert_eq!(Table::from_string("Subs").unwrap(), Table::Subs);
        assert_eq!(Table::from_string("er").unwrap(), Table::Er);
        assert!(matches!(
            Table::from_string("rosters"),
            Err(ProcessingError::InvalidTable(_))
        ));
        assert_eq!(available_tables().len(), 6);
    }

    #[test]
    fn test_split_games() {
        let games = split_games(records(&[
            "version,2",
            "id,AAA202401010",
            "play,1,0,a,00,X,S9",
            "id,AAA202401020",
            "play,1,0,a,00,X,K",
        ]));
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_id, "AAA202401010");
        assert_eq!(games[1].records.len(), 1);
    }

    #[test]
    fn test_run_game_installs_pitchers() {
        let games = split_games(records(&[
            "id,AAA202401010",
            "start,visip001,\"Visiting Pitcher\",0,0,1",
            "start,homep001,\"Home Pitcher\",1,0,1",
            "play,1,0,bat00001,12,CBX,S9",
            "sub,homep002,\"Relief Pitcher\",1,0,1",
            "play,1,0,bat00002,00,BX,HR/F7.1-H",
        ]));
        let run = run_game(&games[0], &PitchCounter::default());
        assert_eq!(run.plays.len(), 2);
        assert_eq!(run.plays[0].pitcher_id, "homep001");
        assert_eq!(run.plays[0].pitch_count, 3);
        assert_eq!(run.plays[0].batter, 1);
        assert_eq!(run.plays[0].first, 1);
        assert_eq!(run.plays[1].pitcher_id, "homep002");
        assert_eq!(run.plays[1].pitch_count, 2);
        assert_eq!(run.plays[1].home, 2);
        assert_eq!(run.plays[1].visitor_score, 2);
        assert!(run.diagnostics.is_empty());
    }

    #[test]
    fn test_subs_share_the_play_sequence() {
        let games = split_games(records(&[
            "id,AAA202401010",
            "version,2",
            "info,visteam,AAA",
            "start,visip001,\"Visiting Pitcher\",0,0,1",
            "play,1,0,bat00001,00,X,S9",
            "com,\"Mound visit\"",
            "sub,pinch001,\"Pinch Hitter\",0,2,11",
            "play,1,0,pinch001,00,X,K",
            "data,er,visip001,0",
        ]));
        let run = run_game(&games[0], &PitchCounter::default());

        let orders: Vec<usize> = run.plays.iter().map(|row| row.order).collect();
        assert_eq!(orders, vec![0, 2]);
        assert_eq!(run.subs[0].order, 1);
        assert_eq!(run.subs[0].batting_order, 2);
        assert_eq!(run.comments[0].order, 1);
        assert_eq!(run.comments[0].comment, "Mound visit");
        assert_eq!(run.info[0].key, "visteam");
        assert_eq!(run.starting[0].version, "2");
        assert_eq!(run.er[0].player_id, "visip001");
        assert_eq!(run.er[0].value, "0");
        assert!(!run.abandoned);
    }

    #[test]
    fn test_invalid_row_abandons_its_game_only() {
        let mut rows = records(&["id,AAA202401010", "play,1,0,a,00,X,S9"]);
        rows.push(Err(ProcessingError::InvalidRecord {
            line: 3,
            detail: "expected team side 0 or 1, found '2'".to_string(),
        }));
        rows.extend(records(&["id,AAA202401020", "play,1,0,a,00,X,K"]));

        let runs = process_records(rows, &RetrosheetConfig::default());
        assert_eq!(runs.len(), 2);
        assert!(runs[0].abandoned);
        assert!(runs[0].plays.is_empty());
        assert_eq!(runs[0].diagnostics.len(), 1);
        assert_eq!(runs[0].diagnostics[0].game_id.as_deref(), Some("AAA202401010"));
        assert!(!runs[1].abandoned);
        assert_eq!(runs[1].plays.len(), 1);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let lines = [
            "id,AAA202401010",
            "play,1,0,a,00,X,S9",
            "play,1,0,b,00,X,64(1)3/GDP",
            "play,1,0,c,00,X,K",
            "id,AAA202401020",
            "play,1,0,a,00,X,W",
            "play,1,0,b,00,X,ZZ9",
        ];
        let mut config = RetrosheetConfig::default();
        config.processing.parallel = true;
        let parallel = process_records(records(&lines), &config);
        config.processing.parallel = false;
        let sequential = process_records(records(&lines), &config);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[1].diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = process_file(
            "does/not/exist.EVA",
            &RetrosheetConfig::default(),
            OutputFormat::Csv,
        );
        assert!(matches!(result, Err(ProcessingError::FileNotFound(_))));
    }
}
