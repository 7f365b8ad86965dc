//! Parser combinator building blocks for play notation.
//!
//! These match single notation atoms (a fielder digit, a runner, a base, a
//! keyword spelled as letters) and the parenthesised groups that hang off
//! baserunning plays and advances. The play grammar in
//! [`parser`](super::parser) composes them.

use chumsky::prelude::*;
use std::ops::Range;

use super::descriptor::{Base, ChainSegment, Fielder, FieldingGroup, FieldingStep, Runner};
use crate::event::lexer::Token;

/// Type alias for parser error
pub(crate) type ParserError = Simple<Token>;

/// Render matched tokens back to their source text
pub(crate) fn render_tokens(tokens: Vec<Token>) -> String {
    tokens.iter().map(ToString::to_string).collect()
}

/// Helper: match a specific token, ignoring it
pub(crate) fn token(t: Token) -> impl Parser<Token, (), Error = ParserError> + Clone {
    just(t).ignored()
}

/// Match a keyword spelled out as consecutive letters, e.g. `POCS`
pub(crate) fn keyword(word: &'static str) -> impl Parser<Token, (), Error = ParserError> + Clone {
    just(word.chars().map(Token::Letter).collect::<Vec<_>>()).ignored()
}

/// A single fielder position digit, 1-9
pub(crate) fn fielder() -> impl Parser<Token, Fielder, Error = ParserError> + Clone {
    filter_map(|span: Range<usize>, tok: Token| match tok {
        Token::Digit(d) => Fielder::new(d)
            .ok_or_else(|| Simple::custom(span, format!("'{}' is not a fielder position", d))),
        other => Err(Simple::custom(
            span,
            format!("expected a fielder position, found '{}'", other),
        )),
    })
}

/// A runner named by the base they start on: `B`, `1`, `2` or `3`
pub(crate) fn runner() -> impl Parser<Token, Runner, Error = ParserError> + Clone {
    filter_map(|span: Range<usize>, tok: Token| match tok {
        Token::Letter('B') => Ok(Runner::Batter),
        Token::Digit(1) => Ok(Runner::First),
        Token::Digit(2) => Ok(Runner::Second),
        Token::Digit(3) => Ok(Runner::Third),
        other => Err(Simple::custom(
            span,
            format!("expected a runner, found '{}'", other),
        )),
    })
}

/// A runner already on base: `1`, `2` or `3`
pub(crate) fn base_runner() -> impl Parser<Token, Runner, Error = ParserError> + Clone {
    runner().try_map(|runner, span| match runner {
        Runner::Batter => Err(Simple::custom(span, "the batter is not on base")),
        on_base => Ok(on_base),
    })
}

/// A destination base: `1`, `2`, `3` or `H`
pub(crate) fn base() -> impl Parser<Token, Base, Error = ParserError> + Clone {
    filter_map(|span: Range<usize>, tok: Token| match tok {
        Token::Digit(1) => Ok(Base::First),
        Token::Digit(2) => Ok(Base::Second),
        Token::Digit(3) => Ok(Base::Third),
        Token::Letter('H') => Ok(Base::Home),
        other => Err(Simple::custom(
            span,
            format!("expected a base, found '{}'", other),
        )),
    })
}

/// A base a runner can steal or be caught stealing: `2`, `3` or `H`
pub(crate) fn steal_target() -> impl Parser<Token, Base, Error = ParserError> + Clone {
    base().try_map(|base, span| match base {
        Base::First => Err(Simple::custom(span, "first base cannot be stolen")),
        target => Ok(target),
    })
}

/// A fielder touching the ball (`6`) or an error charged to one (`E6`)
pub(crate) fn fielding_step() -> impl Parser<Token, FieldingStep, Error = ParserError> + Clone {
    token(Token::Letter('E'))
        .ignore_then(fielder())
        .map(FieldingStep::Error)
        .or(fielder().map(FieldingStep::Fielder))
}

/// A parenthesised fielder chain with an optional throw marker, e.g. `(E5/TH)`
pub(crate) fn fielding_group() -> impl Parser<Token, FieldingGroup, Error = ParserError> + Clone
{
    let throw = token(Token::Slash)
        .ignore_then(keyword("TH"))
        .ignore_then(base().or_not());

    fielding_step()
        .repeated()
        .at_least(1)
        .then(throw.or_not())
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
        .map(|(steps, throw)| FieldingGroup {
            steps,
            throw: throw.is_some(),
        })
}

/// Any other parenthesised note, returned as its source text, e.g. `(NR)`
pub(crate) fn note_group() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter(|t: &Token| !matches!(t, Token::OpenParen | Token::CloseParen))
        .repeated()
        .at_least(1)
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
        .map(render_tokens)
}

/// One segment of a ball-in-play out chain, e.g. `64(1)`
pub(crate) fn chain_segment() -> impl Parser<Token, ChainSegment, Error = ParserError> + Clone {
    fielding_step()
        .repeated()
        .at_least(1)
        .then(
            runner()
                .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
                .or_not(),
        )
        .map(|(steps, runner)| ChainSegment { steps, runner })
}
