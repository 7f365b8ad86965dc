//! Event-file record reader
//!
//! Retrosheet event files are comma-separated, one record per line, with the
//! record type in the first field:
//!
//! ```text
//! id,ANA201704030
//! version,2
//! info,visteam,OAK
//! start,daviy001,"Yonder Davis",0,1,7
//! play,1,0,semij001,32,CBBFBX,S9/G
//! sub,bassa001,"Anthony Bass",1,0,1
//! com,"Scott ejected"
//! data,er,grays001,2
//! ```
//!
//! Player names are quoted, so rows are split with the `csv` crate rather
//! than on bare commas.

use serde::Serialize;
use std::io::Read;

use crate::event::game::Side;
use crate::event::processor::ProcessingError;

/// A lineup entry from a `start` or `sub` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub player_id: String,
    pub name: String,
    pub side: Side,
    pub batting_order: u8,
    pub position: u8,
}

impl Appearance {
    pub fn is_pitcher(&self) -> bool {
        self.position == 1
    }
}

/// A `play` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayRecord {
    pub inning: u8,
    pub side: Side,
    pub batter: String,
    pub count: String,
    pub pitches: String,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Id(String),
    Version(String),
    Info { key: String, value: String },
    Start(Appearance),
    Sub(Appearance),
    Play(PlayRecord),
    Comment(String),
    Data { kind: String, values: Vec<String> },
    Other { kind: String, values: Vec<String> },
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(csv::Trim::All);
    builder
}

fn field<'a>(fields: &'a [String], index: usize, line: u64) -> Result<&'a str, ProcessingError> {
    fields
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| ProcessingError::InvalidRecord {
            line,
            detail: format!("missing field {} in '{}' row", index, fields[0]),
        })
}

fn number(fields: &[String], index: usize, line: u64) -> Result<u8, ProcessingError> {
    let raw = field(fields, index, line)?;
    raw.parse().map_err(|_| ProcessingError::InvalidRecord {
        line,
        detail: format!("expected a number in field {}, found '{}'", index, raw),
    })
}

fn side(fields: &[String], index: usize, line: u64) -> Result<Side, ProcessingError> {
    let raw = field(fields, index, line)?;
    Side::from_code(raw).ok_or_else(|| ProcessingError::InvalidRecord {
        line,
        detail: format!("expected team side 0 or 1, found '{}'", raw),
    })
}

fn appearance(fields: &[String], line: u64) -> Result<Appearance, ProcessingError> {
    Ok(Appearance {
        player_id: field(fields, 1, line)?.to_string(),
        name: field(fields, 2, line)?.to_string(),
        side: side(fields, 3, line)?,
        batting_order: number(fields, 4, line)?,
        position: number(fields, 5, line)?,
    })
}

/// Build a record from fields already split out of one row
pub fn from_fields(fields: &[String], line: u64) -> Result<Record, ProcessingError> {
    let Some(kind) = fields.first() else {
        return Err(ProcessingError::InvalidRecord {
            line,
            detail: "empty row".to_string(),
        });
    };

    let record = match kind.as_str() {
        // A bare `id` row still starts a game, so later games keep their rows
        "id" => Record::Id(fields.get(1).cloned().unwrap_or_default()),
        "version" => Record::Version(field(fields, 1, line)?.to_string()),
        "info" => Record::Info {
            key: field(fields, 1, line)?.to_string(),
            value: fields.get(2).cloned().unwrap_or_default(),
        },
        "start" => Record::Start(appearance(fields, line)?),
        "sub" => Record::Sub(appearance(fields, line)?),
        "play" => Record::Play(PlayRecord {
            inning: number(fields, 1, line)?,
            side: side(fields, 2, line)?,
            batter: field(fields, 3, line)?.to_string(),
            count: field(fields, 4, line)?.to_string(),
            pitches: field(fields, 5, line)?.to_string(),
            event: field(fields, 6, line)?.to_string(),
        }),
        "com" => Record::Comment(fields[1..].join(",")),
        "data" => Record::Data {
            kind: field(fields, 1, line)?.to_string(),
            values: fields[2..].to_vec(),
        },
        other => Record::Other {
            kind: other.to_string(),
            values: fields[1..].to_vec(),
        },
    };
    Ok(record)
}

/// Parse a single event-file row
pub fn parse_line(line: &str) -> Result<Record, ProcessingError> {
    let mut reader = reader_builder().from_reader(line.as_bytes());
    let Some(row) = reader.records().next() else {
        return Err(ProcessingError::InvalidRecord {
            line: 1,
            detail: "empty row".to_string(),
        });
    };
    let fields: Vec<String> = row?.iter().map(str::to_string).collect();
    from_fields(&fields, 1)
}

/// A record, or the reason its row could not be read
pub type RecordRow = Result<Record, ProcessingError>;

/// Read every row of an event file, skipping blank lines.
///
/// A malformed row comes back as an `Err` in its place so the caller can
/// drop the game it belongs to. Only I/O failures end the read.
pub fn read_records<R: Read>(input: R) -> Result<Vec<RecordRow>, ProcessingError> {
    let mut rows = Vec::new();
    for row in reader_builder().from_reader(input).records() {
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                rows.push(Err(e.into()));
                continue;
            }
        };
        let line = row.position().map_or(0, |p| p.line());
        let fields: Vec<String> = row.iter().map(str::to_string).collect();
        if fields.iter().all(String::is_empty) {
            continue;
        }
        rows.push(from_fields(&fields, line));
    }
    let invalid = rows.iter().filter(|row| row.is_err()).count();
    log::debug!("read {} rows, {} invalid", rows.len(), invalid);
    Ok(rows)
}
