//! Implementation of the play lexer
//!
//! The actual tokenization is handled entirely by logos. Unlike document
//! text, a play field has no recovery story: a character outside the
//! notation means the whole field is unreadable, so the first bad character
//! is reported as a syntax error.

use crate::event::diagnostics::DecipherError;
use crate::event::lexer::tokens::Token;
use logos::Logos;

/// Tokenize a play field, keeping the byte span of every token
pub fn tokenize_with_spans(source: &str) -> Result<Vec<(Token, logos::Span)>, DecipherError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(DecipherError::Syntax {
                    raw: source.to_string(),
                    offset: lexer.span().start,
                    detail: format!("unexpected character '{}'", lexer.slice()),
                })
            }
        }
    }

    Ok(tokens)
}

/// Tokenize a play field, dropping spans
pub fn tokenize(source: &str) -> Result<Vec<Token>, DecipherError> {
    Ok(tokenize_with_spans(source)?
        .into_iter()
        .map(|(token, _)| token)
        .collect())
}
