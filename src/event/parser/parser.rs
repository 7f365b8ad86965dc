//! Play grammar implemented with chumsky
//!
//! ```text
//! play        := primary (("+" | ";") primary)* ("/" modifier)* ("." advanceList)?
//! advanceList := advance (";" advance)*
//! advance     := runner ("-" | "X") base ("(" group ")")*
//! ```
//!
//! The grammar is a PEG: alternatives are tried in order and the first one
//! that matches wins. Keywords that share a prefix are therefore listed
//! longest first (`POCS` before `PO`, `SB` before `S`, `WP` before `W`).

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use chumsky::Stream;

use super::combinators::{
    base, base_runner, chain_segment, fielder, fielding_group, fielding_step, keyword,
    note_group, render_tokens, runner, steal_target, token, ParserError,
};
use super::descriptor::{
    AdvanceAnnotation, FieldingGroup, Modifier, PlayDescriptor, PlayKind, RunnerAdvance,
};
use crate::event::diagnostics::DecipherError;
use crate::event::lexer::{lex, Token};

/// A primary as the grammar sees it, before vocabulary is checked
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParsedPrimary {
    Known(PlayKind),
    Unknown(String),
}

/// Parenthesised group following an advance
#[derive(Debug, Clone, PartialEq)]
enum AdvanceGroup {
    Fielding(FieldingGroup),
    Note(String),
}

/// Scorers write `99` when the play itself was not recorded
const UNKNOWN_PLAY: &str = "99";

/// `99` reads like a 9-to-9 out chain but retires nobody
fn is_unknown_play(kind: &PlayKind) -> bool {
    match kind {
        PlayKind::Out(segments) => match segments.as_slice() {
            [segment] => {
                segment.runner.is_none()
                    && segment.steps.len() == 2
                    && segment
                        .steps
                        .iter()
                        .all(|step| !step.is_error() && step.fielder().number() == 9)
            }
            _ => false,
        },
        _ => false,
    }
}

/// Grammar output before conversion into a descriptor
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedPlay {
    pub primaries: Vec<ParsedPrimary>,
    pub modifiers: Vec<String>,
    pub advances: Vec<RunnerAdvance>,
}

impl ParsedPlay {
    fn into_descriptor(self, raw: &str) -> Result<PlayDescriptor, DecipherError> {
        let mut primaries = Vec::with_capacity(self.primaries.len());
        for primary in self.primaries {
            match primary {
                ParsedPrimary::Known(kind) if is_unknown_play(&kind) => {
                    return Err(DecipherError::UnknownPlayCode {
                        raw: raw.to_string(),
                        code: UNKNOWN_PLAY.to_string(),
                    })
                }
                ParsedPrimary::Known(kind) => primaries.push(kind),
                ParsedPrimary::Unknown(code) => {
                    return Err(DecipherError::UnknownPlayCode {
                        raw: raw.to_string(),
                        code,
                    })
                }
            }
        }

        let mut modifiers: Vec<Modifier> = Vec::new();
        for raw_modifier in self.modifiers.iter().filter(|m| !m.is_empty()) {
            let modifier = Modifier::classify(raw_modifier);
            if !modifiers.contains(&modifier) {
                modifiers.push(modifier);
            }
        }

        Ok(PlayDescriptor {
            raw_text: raw.to_string(),
            primaries,
            modifiers,
            advances: self.advances,
        })
    }
}

fn baserunning_play() -> impl Parser<Token, PlayKind, Error = ParserError> + Clone {
    choice((
        keyword("POCS")
            .ignore_then(steal_target())
            .then(fielding_group().or_not())
            .map(|(base, group)| PlayKind::PickoffCaughtStealing { base, group }),
        keyword("PO")
            .ignore_then(base_runner())
            .then(fielding_group().or_not())
            .map(|(runner, group)| PlayKind::Pickoff { runner, group }),
        keyword("PB").to(PlayKind::PassedBall),
        keyword("CS")
            .ignore_then(steal_target())
            .then(fielding_group().or_not())
            .map(|(base, group)| PlayKind::CaughtStealing { base, group }),
        keyword("SB")
            .ignore_then(steal_target())
            .map(PlayKind::StolenBase),
        keyword("WP").to(PlayKind::WildPitch),
        keyword("BK").to(PlayKind::Balk),
        keyword("DI").to(PlayKind::DefensiveIndifference),
        keyword("OA").to(PlayKind::OtherAdvance),
    ))
}

fn batter_play() -> impl Parser<Token, PlayKind, Error = ParserError> + Clone {
    let hits = choice((
        keyword("DGR")
            .ignore_then(fielder().or_not())
            .map(PlayKind::GroundRuleDouble),
        keyword("D")
            .ignore_then(fielder().or_not())
            .map(PlayKind::Double),
        keyword("HP").to(PlayKind::HitByPitch),
        keyword("HR")
            .ignore_then(fielder().or_not())
            .map(PlayKind::HomeRun),
        keyword("H")
            .ignore_then(fielder().or_not())
            .map(PlayKind::HomeRun),
        keyword("S")
            .ignore_then(fielder().or_not())
            .map(PlayKind::Single),
        keyword("T")
            .ignore_then(fielder().or_not())
            .map(PlayKind::Triple),
    ));

    let others = choice((
        keyword("IW").to(PlayKind::IntentionalWalk),
        keyword("I").to(PlayKind::IntentionalWalk),
        keyword("W").to(PlayKind::Walk),
        keyword("K")
            .ignore_then(fielding_step().repeated())
            .map(PlayKind::Strikeout),
        keyword("E").ignore_then(fielder()).map(PlayKind::Error),
        keyword("FC")
            .ignore_then(fielder().or_not())
            .map(PlayKind::FieldersChoice),
        keyword("FLE")
            .ignore_then(fielder())
            .map(PlayKind::FoulFlyError),
        keyword("C").to(PlayKind::CatcherInterference),
        keyword("NP").to(PlayKind::NoPlay),
    ));

    hits.or(others)
}

/// Grammar-shaped but unrecognised code: letters followed by digits
fn unknown_code() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter(Token::is_letter)
        .repeated()
        .at_least(1)
        .then(filter(Token::is_digit).repeated())
        .map(|(mut letters, digits)| {
            letters.extend(digits);
            render_tokens(letters)
        })
}

/// One primary play token
pub(crate) fn primary() -> BoxedParser<'static, Token, ParsedPrimary, ParserError> {
    baserunning_play()
        .or(batter_play())
        .or(chain_segment().repeated().at_least(1).map(PlayKind::Out))
        .map(ParsedPrimary::Known)
        .or(unknown_code().map(ParsedPrimary::Unknown))
        .labelled("primary play")
        .boxed()
}

/// One advance clause, e.g. `1X3(8254)` or `B-H(UR)(NR)`
pub(crate) fn advance() -> impl Parser<Token, RunnerAdvance, Error = ParserError> + Clone {
    let separator = token(Token::Dash)
        .to(false)
        .or(token(Token::Letter('X')).to(true));

    let group = fielding_group()
        .map(AdvanceGroup::Fielding)
        .or(note_group().map(AdvanceGroup::Note));

    runner()
        .then(separator)
        .then(base())
        .then(group.repeated())
        .map(|(((from, marked_out), to), groups)| {
            let mut fielder_chain = Vec::new();
            let mut annotations = Vec::new();
            for group in groups {
                match group {
                    AdvanceGroup::Fielding(fielding) => {
                        fielder_chain.extend(fielding.steps);
                        if fielding.throw {
                            annotations.push(AdvanceAnnotation::Throw);
                        }
                    }
                    AdvanceGroup::Note(note) => {
                        annotations.push(AdvanceAnnotation::classify(&note))
                    }
                }
            }
            annotations.sort();
            annotations.dedup();

            // An error in the chain negates the out
            let is_out = marked_out && !fielder_chain.iter().any(|step| step.is_error());

            RunnerAdvance {
                from,
                to,
                is_out,
                fielder_chain,
                annotations,
            }
        })
        .labelled("advance")
}

/// The complete play grammar
pub(crate) fn play() -> impl Parser<Token, ParsedPlay, Error = ParserError> {
    let primaries = primary()
        .separated_by(token(Token::Plus).or(token(Token::Semicolon)))
        .at_least(1);

    let modifier = filter(|t: &Token| !t.is_section_marker())
        .repeated()
        .map(render_tokens);

    let modifiers = token(Token::Slash).ignore_then(modifier).repeated();

    let advances = token(Token::Period)
        .ignore_then(advance().separated_by(token(Token::Semicolon)).at_least(1))
        .or_not();

    primaries
        .then(modifiers)
        .then(advances)
        .then_ignore(end())
        .map(|((primaries, modifiers), advances)| ParsedPlay {
            primaries,
            modifiers,
            advances: advances.unwrap_or_default(),
        })
}

fn describe_error(error: &ParserError) -> String {
    match error.reason() {
        SimpleReason::Custom(message) => message.clone(),
        _ => {
            let found = error
                .found()
                .map(|t| format!("'{}'", t))
                .unwrap_or_else(|| "end of input".to_string());
            match error.label() {
                Some(label) => format!("unexpected {} while parsing {}", found, label),
                None => format!("unexpected {}", found),
            }
        }
    }
}

/// A word of the primary section that is letter-shaped but not a known code.
///
/// A known keyword can match a prefix of an unknown code (`S` in `SH`), after
/// which the grammar fails with a syntax error. Checking each primary word on
/// its own tells those cases apart.
fn unknown_primary_word(text: &str) -> Option<String> {
    let primary_section = text.split(['/', '.']).next().unwrap_or("");
    primary_section
        .split(['+', ';'])
        .filter(|word| {
            let mut chars = word.chars().peekable();
            let mut letters = 0;
            while chars.next_if(|c| c.is_ascii_uppercase()).is_some() {
                letters += 1;
            }
            letters > 0 && chars.all(|c| c.is_ascii_digit())
        })
        .find(|word| !is_known_primary(word))
        .map(str::to_string)
}

fn is_known_primary(word: &str) -> bool {
    let Ok(tokens) = lex(word) else {
        return false;
    };
    let len = word.len();
    matches!(
        primary()
            .then_ignore(end())
            .parse(Stream::from_iter(len..len + 1, tokens.into_iter())),
        Ok(ParsedPrimary::Known(_))
    )
}

/// Parse one play field into a descriptor.
///
/// An empty field yields [`PlayDescriptor::no_play`]. Unrecognised primary
/// codes yield [`DecipherError::UnknownPlayCode`]; anything else that does not
/// match the grammar yields [`DecipherError::Syntax`].
pub fn parse(raw: &str) -> Result<PlayDescriptor, DecipherError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(PlayDescriptor::no_play(raw));
    }

    let tokens = lex(text)?;
    let len = text.len();

    match play().parse(Stream::from_iter(len..len + 1, tokens.into_iter())) {
        Ok(parsed) => parsed.into_descriptor(raw),
        Err(errors) => {
            if let Some(code) = unknown_primary_word(text) {
                return Err(DecipherError::UnknownPlayCode {
                    raw: raw.to_string(),
                    code,
                });
            }
            let (offset, detail) = errors
                .first()
                .map(|e| (e.span().start, describe_error(e)))
                .unwrap_or((0, "unrecognised play".to_string()));
            Err(DecipherError::Syntax {
                raw: raw.to_string(),
                offset,
                detail,
            })
        }
    }
}
