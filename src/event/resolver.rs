//! Advance resolution
//!
//! [`resolve`] combines the implicit movement of a play with its explicit
//! advance section and applies both to the occupancy before the play.
//!
//! Runners are tracked by where they started (`B`, `1`, `2`, `3`), since that
//! is how the notation names them. Each starts at its base (or at the plate)
//! and ends on a base, across the plate, or out. Because advances are keyed
//! on origin, `S7.1-2` resolves the same whichever movement is applied first.
//!
//! Order of application:
//! 1. implicit batter movement, then implicit runner movement, each skipped
//!    when the advance section names the same runner;
//! 2. on a base award (walk, hit by pitch, interference), forced runners the
//!    advance section leaves out move up one base;
//! 3. explicit advances, strictly in notation order.
//!
//! Inconsistencies never abort resolution. They are returned as diagnostics
//! next to a best-effort outcome.

use serde::Serialize;

use crate::event::bases::{BaseState, OUTS_PER_HALF};
use crate::event::classifier::{classify, FieldingCredits, Movement, Sacrifice};
use crate::event::diagnostics::DecipherError;
use crate::event::parser::{Base, PlayDescriptor, PlayKind, Runner, RunnerAdvance};

/// What became of the batter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattingResult {
    Reached(Base),
    Out,
}

/// The effect of one play on the half-inning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayOutcome {
    pub outs_added: u8,
    pub runs_scored: u8,
    pub base_state_after: BaseState,
    /// `None` when the plate appearance continues, e.g. after a stolen base
    pub batting_result: Option<BattingResult>,
    pub half_inning_ended: bool,
    pub fielding: FieldingCredits,
    pub sacrifice: Option<Sacrifice>,
}

impl PlayOutcome {
    /// An outcome that leaves `bases` untouched
    pub fn no_effect(bases: &BaseState) -> Self {
        PlayOutcome {
            outs_added: 0,
            runs_scored: 0,
            base_state_after: *bases,
            batting_result: None,
            half_inning_ended: false,
            fielding: FieldingCredits::default(),
            sacrifice: None,
        }
    }
}

/// A resolved play and the inconsistencies met on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: PlayOutcome,
    pub diagnostics: Vec<DecipherError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spot {
    AtBat,
    On(Base),
    Scored,
    Retired,
    Absent,
}

/// Working positions of the four possible runners, indexed by origin
struct Diamond {
    spots: [Spot; 4],
    outs: u8,
    runs: u8,
    fielding: FieldingCredits,
}

impl Diamond {
    fn new(bases: &BaseState) -> Self {
        let mut spots = [Spot::AtBat; 4];
        for runner in [Runner::First, Runner::Second, Runner::Third] {
            spots[runner.index()] = match runner.base() {
                Some(base) if bases.is_occupied(base) => Spot::On(base),
                _ => Spot::Absent,
            };
        }
        Diamond {
            spots,
            outs: 0,
            runs: 0,
            fielding: FieldingCredits::default(),
        }
    }

    fn spot(&self, runner: Runner) -> Spot {
        self.spots[runner.index()]
    }

    fn advance(
        &mut self,
        runner: Runner,
        movement: Movement,
        credits: FieldingCredits,
    ) -> Result<(), DecipherError> {
        match self.spot(runner) {
            Spot::Absent => {
                return Err(DecipherError::StateMismatch {
                    detail: format!("advance from {} but the base is empty", runner),
                })
            }
            Spot::Scored => {
                return Err(DecipherError::StateMismatch {
                    detail: format!("runner from {} already scored on this play", runner),
                })
            }
            Spot::Retired => {
                return Err(DecipherError::StateMismatch {
                    detail: format!("runner from {} is already out on this play", runner),
                })
            }
            Spot::AtBat | Spot::On(_) => {}
        }

        self.spots[runner.index()] = match movement {
            Movement::Out => {
                self.outs += 1;
                Spot::Retired
            }
            Movement::Safe(Base::Home) => {
                self.runs += 1;
                Spot::Scored
            }
            Movement::Safe(base) => Spot::On(base),
        };
        self.fielding.merge(credits);
        Ok(())
    }

    fn explicit(
        &mut self,
        advance: &RunnerAdvance,
        kept: FieldingCredits,
    ) -> Result<(), DecipherError> {
        let movement = if advance.is_out {
            Movement::Out
        } else {
            Movement::Safe(advance.to)
        };
        let mut credits = kept;
        let has_error = advance.fielder_chain.iter().any(|step| step.is_error());
        if advance.is_out || has_error {
            credits.merge(FieldingCredits::for_chain(&advance.fielder_chain));
        }
        self.advance(advance.from, movement, credits)
    }

    fn collisions(&self) -> Vec<DecipherError> {
        [Base::First, Base::Second, Base::Third]
            .into_iter()
            .filter_map(|base| {
                let count = self.spots.iter().filter(|s| **s == Spot::On(base)).count();
                (count > 1).then(|| DecipherError::StateMismatch {
                    detail: format!("{} runners end the play on base {}", count, base),
                })
            })
            .collect()
    }

    fn occupancy(&self) -> BaseState {
        let mut bases = BaseState::empty();
        for spot in self.spots {
            if let Spot::On(base) = spot {
                bases.set(base, true);
            }
        }
        bases
    }

    fn batting_result(&self) -> Option<BattingResult> {
        match self.spot(Runner::Batter) {
            Spot::On(base) => Some(BattingResult::Reached(base)),
            Spot::Scored => Some(BattingResult::Reached(Base::Home)),
            Spot::Retired => Some(BattingResult::Out),
            Spot::AtBat | Spot::Absent => None,
        }
    }
}

/// Runners forced to move up when the batter takes first base
fn forced_runners(before: &BaseState) -> Vec<Runner> {
    [Runner::First, Runner::Second, Runner::Third]
        .into_iter()
        .take_while(|runner| runner.base().is_some_and(|base| before.is_occupied(base)))
        .collect()
}

/// Apply a play to the occupancy before it.
pub fn resolve(descriptor: &PlayDescriptor, before: &BaseState) -> Resolution {
    let implicit = classify(descriptor);
    let mut diamond = Diamond::new(before);
    let mut diagnostics = Vec::new();

    diamond.fielding.merge(implicit.credits.clone());

    for implied in &implicit.moves {
        if descriptor.advance_for(implied.runner).is_some() {
            continue;
        }
        let credits = implied.credits.clone();
        if let Err(err) = diamond.advance(implied.runner, implied.movement, credits) {
            log::debug!("skipping implied move in '{}': {}", descriptor.raw_text, err);
            diagnostics.push(err);
        }
    }

    if descriptor.primaries.iter().any(PlayKind::awards_first_base) {
        for runner in forced_runners(before) {
            if descriptor.advance_for(runner).is_some() {
                continue;
            }
            let forced = Movement::Safe(runner.next_base());
            if let Err(err) = diamond.advance(runner, forced, FieldingCredits::default()) {
                diagnostics.push(err);
            }
        }
    }

    for advance in &descriptor.advances {
        // An overridden implicit move still charges its errors
        let kept = implicit
            .move_for(advance.from)
            .map(|m| m.credits.errors_only())
            .unwrap_or_default();
        if let Err(err) = diamond.explicit(advance, kept) {
            log::debug!("skipping advance {} in '{}': {}", advance, descriptor.raw_text, err);
            diagnostics.push(err);
        }
    }

    diagnostics.extend(diamond.collisions());

    let mut outs_added = diamond.outs;
    let total = before.outs() + outs_added;
    if total > OUTS_PER_HALF {
        diagnostics.push(DecipherError::HalfInningOutMismatch { outs: total });
        outs_added = OUTS_PER_HALF - before.outs();
    }
    let outs_after = before.outs() + outs_added;

    // outs_after never exceeds OUTS_PER_HALF, so this cannot fail
    let base_state_after = diamond
        .occupancy()
        .with_outs(outs_after)
        .unwrap_or_else(|_| diamond.occupancy());

    Resolution {
        outcome: PlayOutcome {
            outs_added,
            runs_scored: diamond.runs,
            base_state_after,
            batting_result: diamond.batting_result(),
            half_inning_ended: outs_after == OUTS_PER_HALF,
            fielding: diamond.fielding,
            sacrifice: implicit.sacrifice,
        },
        diagnostics,
    }
}
