//! Token definitions for Retrosheet play notation
//!
//! The notation is character oriented: keywords such as `HR`, `FC` or `POCS`
//! are sequences of single letters, and fielder chains such as `8254` are
//! sequences of single digits. Keeping the tokens this small lets the
//! parser decide what a letter means from where it appears (`B` is a runner
//! in `B-1` but part of a keyword in `BK`).
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All possible tokens in a play field
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize)]
pub enum Token {
    #[regex(r"[A-Z]", |lex| lex.slice().chars().next())]
    Letter(char),

    #[regex(r"[0-9]", |lex| lex.slice().as_bytes()[0] - b'0')]
    Digit(u8),

    // Separators
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token(".")]
    Period,
    #[token(";")]
    Semicolon,
    #[token("-")]
    Dash,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,

    // Uncertainty and exceptional-play marks, kept verbatim in modifiers
    #[regex(r"[#!?*]", |lex| lex.slice().chars().next())]
    Mark(char),
}

impl Token {
    /// Check if this token is a digit
    pub fn is_digit(&self) -> bool {
        matches!(self, Token::Digit(_))
    }

    /// Check if this token is a letter
    pub fn is_letter(&self) -> bool {
        matches!(self, Token::Letter(_))
    }

    /// Check if this token separates sections of a play
    pub fn is_section_marker(&self) -> bool {
        matches!(self, Token::Slash | Token::Period)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Letter(c) | Token::Mark(c) => write!(f, "{}", c),
            Token::Digit(d) => write!(f, "{}", d),
            Token::Plus => write!(f, "+"),
            Token::Slash => write!(f, "/"),
            Token::Period => write!(f, "."),
            Token::Semicolon => write!(f, ";"),
            Token::Dash => write!(f, "-"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
        }
    }
}
