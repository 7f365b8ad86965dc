//! Lexer module for play notation
//!
//! This module contains the tokenization logic for the play field of an
//! event file, including token definitions and the lexer implementation.
//! Play fields carry no surrounding whitespace that matters, so [`lex`]
//! trims before tokenizing.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{tokenize, tokenize_with_spans};
pub use tokens::Token;

use crate::event::diagnostics::DecipherError;

/// Main lexer function: trimmed play field to tokens with spans
pub fn lex(source: &str) -> Result<Vec<(Token, std::ops::Range<usize>)>, DecipherError> {
    tokenize_with_spans(source.trim())
}
