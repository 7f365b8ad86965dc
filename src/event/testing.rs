//! Fluent assertions for play outcomes
//!
//! Checking an outcome field by field buries what a test is about. The
//! builder returned by [`assert_outcome`] reads like the play it describes:
//!
//! ```rust,ignore
//! use retrosheet::event::testing::assert_outcome;
//!
//! let before = BaseState::new(true, true, true, 0)?;
//! let outcome = resolve(&parse("S8.3-H;2-H;1X3(8254)")?, &before).outcome;
//!
//! assert_outcome(&outcome)
//!     .outs(1)
//!     .runs(2)
//!     .batter_reached(Base::First)
//!     .bases(true, false, false)
//!     .putouts(&[4])
//!     .assists(&[8, 2, 5]);
//! ```
//!
//! Failure messages name the play field and the mismatching value.

use crate::event::classifier::Sacrifice;
use crate::event::parser::{Base, Fielder};
use crate::event::resolver::{BattingResult, PlayOutcome};

/// Create an assertion builder for an outcome
pub fn assert_outcome(outcome: &PlayOutcome) -> OutcomeAssertion<'_> {
    OutcomeAssertion {
        outcome,
        context: "outcome".to_string(),
    }
}

pub struct OutcomeAssertion<'a> {
    outcome: &'a PlayOutcome,
    context: String,
}

impl<'a> OutcomeAssertion<'a> {
    /// Label failures with the play they came from
    pub fn for_play(mut self, raw: &str) -> Self {
        self.context = format!("play '{}'", raw);
        self
    }

    pub fn outs(self, expected: u8) -> Self {
        assert_eq!(
            self.outcome.outs_added, expected,
            "{}: expected {} outs added, found {}",
            self.context, expected, self.outcome.outs_added
        );
        self
    }

    pub fn runs(self, expected: u8) -> Self {
        assert_eq!(
            self.outcome.runs_scored, expected,
            "{}: expected {} runs, found {}",
            self.context, expected, self.outcome.runs_scored
        );
        self
    }

    pub fn batter_reached(self, base: Base) -> Self {
        self.batting_result(Some(BattingResult::Reached(base)))
    }

    pub fn batter_out(self) -> Self {
        self.batting_result(Some(BattingResult::Out))
    }

    /// The plate appearance continues
    pub fn batter_at_plate(self) -> Self {
        self.batting_result(None)
    }

    fn batting_result(self, expected: Option<BattingResult>) -> Self {
        assert_eq!(
            self.outcome.batting_result, expected,
            "{}: expected batting result {:?}, found {:?}",
            self.context, expected, self.outcome.batting_result
        );
        self
    }

    /// Occupancy of first, second and third after the play
    pub fn bases(self, first: bool, second: bool, third: bool) -> Self {
        let after = &self.outcome.base_state_after;
        assert_eq!(
            (after.first, after.second, after.third),
            (first, second, third),
            "{}: expected bases {:?}, found {}",
            self.context,
            (first, second, third),
            after
        );
        self
    }

    pub fn half_inning_ended(self, expected: bool) -> Self {
        assert_eq!(
            self.outcome.half_inning_ended, expected,
            "{}: expected half_inning_ended = {}",
            self.context, expected
        );
        self
    }

    pub fn putouts(self, expected: &[u8]) -> Self {
        check_fielders(&self.context, "putouts", &self.outcome.fielding.putouts, expected);
        self
    }

    pub fn assists(self, expected: &[u8]) -> Self {
        check_fielders(&self.context, "assists", &self.outcome.fielding.assists, expected);
        self
    }

    pub fn errors(self, expected: &[u8]) -> Self {
        check_fielders(&self.context, "errors", &self.outcome.fielding.errors, expected);
        self
    }

    pub fn sacrifice(self, expected: Option<Sacrifice>) -> Self {
        assert_eq!(
            self.outcome.sacrifice, expected,
            "{}: expected sacrifice {:?}, found {:?}",
            self.context, expected, self.outcome.sacrifice
        );
        self
    }
}

fn check_fielders(context: &str, what: &str, actual: &[Fielder], expected: &[u8]) {
    let actual: Vec<u8> = actual.iter().map(Fielder::number).collect();
    assert_eq!(
        actual, expected,
        "{}: expected {} {:?}, found {:?}",
        context, what, expected, actual
    );
}
