//! Errors and diagnostics for play deciphering
//!
//! Malformed input never aborts a batch. The parser and resolver report
//! problems as [`DecipherError`] values; the game state machine wraps them in
//! a [`Diagnostic`] carrying the play context, returns a best-effort outcome
//! and lets the caller accumulate diagnostics into an error log.
//!
//! Taxonomy:
//! - `Syntax`: the play field does not match the notation grammar
//! - `UnknownPlayCode`: grammar-shaped, but the primary code is not in the vocabulary
//! - `StateMismatch`: an advance references a base nobody occupies, or two
//!   runners end up on the same base
//! - `HalfInningOutMismatch`: a half-inning boundary did not land on 3 outs
//! - `InvalidRecord`: an event-file row could not be read; its game is
//!   abandoned and the rest of the file is still processed
//! - `Invariant`: a structural invariant was violated by the caller, which is a
//!   programming error rather than bad input

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecipherError {
    #[error("syntax error in play '{raw}' at offset {offset}: {detail}")]
    Syntax {
        raw: String,
        offset: usize,
        detail: String,
    },

    #[error("unknown play code '{code}' in play '{raw}'")]
    UnknownPlayCode { raw: String, code: String },

    #[error("state mismatch: {detail}")]
    StateMismatch { detail: String },

    #[error("half-inning ended with {outs} outs")]
    HalfInningOutMismatch { outs: u8 },

    #[error("invalid record on line {line}: {detail}")]
    InvalidRecord { line: u64, detail: String },

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl DecipherError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            DecipherError::Syntax { .. } => DiagnosticKind::Syntax,
            DecipherError::UnknownPlayCode { .. } => DiagnosticKind::UnknownPlayCode,
            DecipherError::StateMismatch { .. } => DiagnosticKind::StateMismatch,
            DecipherError::HalfInningOutMismatch { .. } => DiagnosticKind::HalfInningOutMismatch,
            DecipherError::InvalidRecord { .. } => DiagnosticKind::InvalidRecord,
            DecipherError::Invariant(_) => DiagnosticKind::Invariant,
        }
    }

    /// Input errors are recoverable; invariant violations are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DecipherError::Invariant(_))
    }
}

/// Diagnostic categories, one per error variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    Syntax,
    UnknownPlayCode,
    StateMismatch,
    HalfInningOutMismatch,
    InvalidRecord,
    Invariant,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::UnknownPlayCode => "unknown-play-code",
            DiagnosticKind::StateMismatch => "state-mismatch",
            DiagnosticKind::HalfInningOutMismatch => "half-inning-out-mismatch",
            DiagnosticKind::InvalidRecord => "invalid-record",
            DiagnosticKind::Invariant => "invariant",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A recorded problem with the play context it was found in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub game_id: Option<String>,
    pub inning: Option<u8>,
    pub play: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        let severity = match kind {
            DiagnosticKind::Syntax | DiagnosticKind::InvalidRecord | DiagnosticKind::Invariant => {
                Severity::Error
            }
            _ => Severity::Warning,
        };
        Self {
            kind,
            severity,
            message: message.into(),
            game_id: None,
            inning: None,
            play: None,
        }
    }

    pub fn with_game(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    pub fn with_inning(mut self, inning: u8) -> Self {
        self.inning = Some(inning);
        self
    }

    pub fn with_play(mut self, play: impl Into<String>) -> Self {
        self.play = Some(play.into());
        self
    }
}

impl From<DecipherError> for Diagnostic {
    fn from(err: DecipherError) -> Self {
        Diagnostic::new(err.kind(), err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.severity, self.kind)?;
        if let Some(game_id) = &self.game_id {
            write!(f, " game {}", game_id)?;
        }
        if let Some(inning) = self.inning {
            write!(f, " inning {}", inning)?;
        }
        if let Some(play) = &self.play {
            write!(f, " [{}]", play)?;
        }
        write!(f, ": {}", self.message)
    }
}
