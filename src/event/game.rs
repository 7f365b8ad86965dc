//! Per-game state machine
//!
//! A [`GameState`] threads everything one play needs from the plays before
//! it: base occupancy and outs of the current half-inning, the score, and the
//! pitcher of record and running pitch count for each fielding side.
//!
//! Transitions are explicit. [`GameState::apply`] returns the next state and
//! a [`PlayReport`]; [`GameState::apply_mut`] is the in-place form used when
//! driving a whole game.

use serde::Serialize;
use std::fmt;

use crate::event::bases::BaseState;
use crate::event::diagnostics::{DecipherError, Diagnostic};
use crate::event::parser::{parse, PlayDescriptor};
use crate::event::pitches::PitchCounter;
use crate::event::resolver::{resolve, PlayOutcome};

/// The team at bat (or in the field)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Visitor,
    Home,
}

impl Side {
    /// Event files write `0` for the visitor and `1` for the home team
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Side::Visitor),
            "1" => Some(Side::Home),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Side::Visitor => "0",
            Side::Home => "1",
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::Visitor => Side::Home,
            Side::Home => Side::Visitor,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Visitor => write!(f, "visitor"),
            Side::Home => write!(f, "home"),
        }
    }
}

/// Row context that accompanies a play field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayContext {
    pub inning: u8,
    pub batting: Side,
    pub batter: String,
    pub count: String,
    pub pitches: String,
}

impl PlayContext {
    pub fn new(inning: u8, batting: Side) -> Self {
        Self {
            inning,
            batting,
            ..Default::default()
        }
    }

    pub fn with_batter(mut self, batter: impl Into<String>) -> Self {
        self.batter = batter.into();
        self
    }

    pub fn with_count(mut self, count: impl Into<String>) -> Self {
        self.count = count.into();
        self
    }

    pub fn with_pitches(mut self, pitches: impl Into<String>) -> Self {
        self.pitches = pitches.into();
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub visitor: u32,
    pub home: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Visitor => self.visitor,
            Side::Home => self.home,
        }
    }

    fn add(&mut self, side: Side, runs: u32) {
        match side {
            Side::Visitor => self.visitor += runs,
            Side::Home => self.home += runs,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.visitor, self.home)
    }
}

/// The pitcher currently on the mound for one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PitcherOfRecord {
    pub id: Option<String>,
    pub pitch_count: u32,
}

/// Everything produced by applying one play
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayReport {
    pub inning: u8,
    pub batting: Side,
    /// `None` when the play field could not be read
    pub descriptor: Option<PlayDescriptor>,
    pub bases_before: BaseState,
    pub outcome: PlayOutcome,
    /// Runs scored by the batting side so far this half-inning
    pub half_runs: u32,
    pub pitcher: Option<String>,
    pub pitch_count: u32,
    pub score: Score,
    pub diagnostics: Vec<Diagnostic>,
}

/// State carried from one play of a game to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    game_id: Option<String>,
    bases: BaseState,
    half: Option<(u8, Side)>,
    half_runs: u32,
    score: Score,
    visitor_pitcher: PitcherOfRecord,
    home_pitcher: PitcherOfRecord,
    counter: PitchCounter,
    plays: usize,
}

impl GameState {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: Some(game_id.into()),
            ..Default::default()
        }
    }

    pub fn with_pitch_counter(mut self, counter: PitchCounter) -> Self {
        self.counter = counter;
        self
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn bases(&self) -> &BaseState {
        &self.bases
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn plays(&self) -> usize {
        self.plays
    }

    /// The current half-inning, once a play has been applied
    pub fn half_inning(&self) -> Option<(u8, Side)> {
        self.half
    }

    /// The pitcher of record for the side in the field
    pub fn pitcher(&self, fielding: Side) -> &PitcherOfRecord {
        match fielding {
            Side::Visitor => &self.visitor_pitcher,
            Side::Home => &self.home_pitcher,
        }
    }

    fn pitcher_mut(&mut self, fielding: Side) -> &mut PitcherOfRecord {
        match fielding {
            Side::Visitor => &mut self.visitor_pitcher,
            Side::Home => &mut self.home_pitcher,
        }
    }

    /// Install a new pitcher of record with a pitch count of zero.
    pub fn install_pitcher(&mut self, side: Side, id: impl Into<String>) {
        let id = id.into();
        log::trace!("{} pitcher is now {}", side, id);
        *self.pitcher_mut(side) = PitcherOfRecord {
            id: Some(id),
            pitch_count: 0,
        };
    }

    /// Apply a play and return the next state together with the report.
    pub fn apply(&self, raw: &str, context: &PlayContext) -> (GameState, PlayReport) {
        let mut next = self.clone();
        let report = next.apply_mut(raw, context);
        (next, report)
    }

    /// Apply a play in place.
    pub fn apply_mut(&mut self, raw: &str, context: &PlayContext) -> PlayReport {
        let batting = context.batting;
        let mut errors: Vec<DecipherError> = Vec::new();

        if self.half != Some((context.inning, batting)) {
            self.start_half(context.inning, batting, &mut errors);
        }

        let parsed = parse(raw);

        if self.bases.is_complete() && !matches!(&parsed, Ok(d) if d.is_no_play()) {
            errors.push(DecipherError::StateMismatch {
                detail: "play recorded after the third out".to_string(),
            });
            self.bases = BaseState::empty();
        }

        let bases_before = self.bases;
        let (descriptor, outcome) = match parsed {
            Ok(descriptor) => {
                let resolution = resolve(&descriptor, &bases_before);
                errors.extend(resolution.diagnostics);
                (Some(descriptor), resolution.outcome)
            }
            Err(err) => {
                log::warn!("{}", err);
                errors.push(err);
                (None, PlayOutcome::no_effect(&bases_before))
            }
        };

        self.score.add(batting, u32::from(outcome.runs_scored));
        self.half_runs += u32::from(outcome.runs_scored);

        // A closed half keeps its three outs and clears the bases
        self.bases = outcome.base_state_after;
        if outcome.half_inning_ended {
            if !bases_before.is_complete() {
                log::trace!(
                    "inning {} {} closed with {} runs",
                    context.inning,
                    batting,
                    self.half_runs
                );
            }
            self.bases = self.bases.with_runners(false, false, false);
        }

        let counter = self.counter.clone();
        let pitcher = self.pitcher_mut(batting.opponent());
        pitcher.pitch_count = counter.count(&context.pitches, pitcher.pitch_count);
        let (pitcher_id, pitch_count) = (pitcher.id.clone(), pitcher.pitch_count);

        self.plays += 1;

        let diagnostics = errors
            .into_iter()
            .map(|err| self.diagnostic(err, context.inning, raw))
            .collect::<Vec<_>>();
        for diagnostic in &diagnostics {
            log::debug!("{}", diagnostic);
        }

        PlayReport {
            inning: context.inning,
            batting,
            descriptor,
            bases_before,
            outcome,
            half_runs: self.half_runs,
            pitcher: pitcher_id,
            pitch_count,
            score: self.score,
            diagnostics,
        }
    }

    fn start_half(&mut self, inning: u8, batting: Side, errors: &mut Vec<DecipherError>) {
        if self.half.is_some() && !self.bases.is_complete() {
            errors.push(DecipherError::HalfInningOutMismatch {
                outs: self.bases.outs(),
            });
        }
        log::trace!("start of inning {} for {}", inning, batting);
        self.half = Some((inning, batting));
        self.half_runs = 0;
        self.bases = BaseState::empty();
    }

    fn diagnostic(&self, err: DecipherError, inning: u8, raw: &str) -> Diagnostic {
        let diagnostic = Diagnostic::from(err).with_inning(inning).with_play(raw);
        match &self.game_id {
            Some(game_id) => diagnostic.with_game(game_id.clone()),
            None => diagnostic,
        }
    }
}
