//! Play-by-play deciphering
//!
//! Leaves first: [`lexer`] → [`parser`] → [`classifier`] → [`resolver`] →
//! [`pitches`] → [`game`]. The [`records`] reader and the [`processor`] run
//! the core over whole event files.

pub mod bases;
pub mod classifier;
pub mod diagnostics;
pub mod game;
pub mod lexer;
pub mod parser;
pub mod pitches;
pub mod processor;
pub mod records;
pub mod resolver;
pub mod testing;

pub use bases::BaseState;
pub use diagnostics::{DecipherError, Diagnostic, DiagnosticKind, Severity};
pub use game::{GameState, PlayContext, PlayReport, Score, Side};
pub use parser::{parse, PlayDescriptor};
pub use resolver::{resolve, BattingResult, PlayOutcome, Resolution};
