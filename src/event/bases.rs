//! Base occupancy and outs within a half-inning

use serde::Serialize;
use std::fmt;

use crate::event::diagnostics::DecipherError;
use crate::event::parser::{Base, Runner};

pub const OUTS_PER_HALF: u8 = 3;

/// Which bases are occupied and how many are out.
///
/// Only presence is tracked, not who the runner is. `outs` is kept private so
/// a state with more than three outs cannot be built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BaseState {
    pub first: bool,
    pub second: bool,
    pub third: bool,
    outs: u8,
}

impl BaseState {
    /// Bases empty, nobody out
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(first: bool, second: bool, third: bool, outs: u8) -> Result<Self, DecipherError> {
        Self::empty()
            .with_runners(first, second, third)
            .with_outs(outs)
    }

    pub fn with_runners(mut self, first: bool, second: bool, third: bool) -> Self {
        self.first = first;
        self.second = second;
        self.third = third;
        self
    }

    pub fn with_runner_on(mut self, base: Base) -> Self {
        self.set(base, true);
        self
    }

    pub fn with_outs(mut self, outs: u8) -> Result<Self, DecipherError> {
        if outs > OUTS_PER_HALF {
            return Err(DecipherError::Invariant(format!(
                "a half-inning cannot have {} outs",
                outs
            )));
        }
        self.outs = outs;
        Ok(self)
    }

    pub fn outs(&self) -> u8 {
        self.outs
    }

    pub fn is_occupied(&self, base: Base) -> bool {
        match base {
            Base::First => self.first,
            Base::Second => self.second,
            Base::Third => self.third,
            Base::Home => false,
        }
    }

    /// Whether the runner is present before the play; the batter always is
    pub fn has_runner(&self, runner: Runner) -> bool {
        runner.base().map_or(true, |base| self.is_occupied(base))
    }

    pub fn set(&mut self, base: Base, occupied: bool) {
        match base {
            Base::First => self.first = occupied,
            Base::Second => self.second = occupied,
            Base::Third => self.third = occupied,
            Base::Home => {}
        }
    }

    pub fn runner_count(&self) -> usize {
        [self.first, self.second, self.third]
            .iter()
            .filter(|occupied| **occupied)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.runner_count() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.outs == OUTS_PER_HALF
    }
}

impl fmt::Display for BaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |occupied: bool, label: char| if occupied { label } else { '-' };
        write!(
            f,
            "{}{}{} {} out",
            mark(self.first, '1'),
            mark(self.second, '2'),
            mark(self.third, '3'),
            self.outs
        )
    }
}
