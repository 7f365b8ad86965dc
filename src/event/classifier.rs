//! Implicit movement implied by the primary play codes
//!
//! A play field only lists the advances the scorer could not leave implicit.
//! A single puts the batter on first without writing `B-1`, a `64(1)3` double
//! play retires the runner from first and the batter without an advance
//! section. [`classify`] recovers that implied movement together with the
//! fielding credit each out or error carries. The resolver applies it unless
//! an explicit advance names the same runner.

use serde::Serialize;

use crate::event::parser::{
    Base, ChainSegment, Fielder, FieldingGroup, FieldingStep, Modifier, PlayDescriptor, PlayKind,
    Runner,
};

/// Fielding credit accumulated by a play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldingCredits {
    pub putouts: Vec<Fielder>,
    pub assists: Vec<Fielder>,
    pub errors: Vec<Fielder>,
}

impl FieldingCredits {
    /// Credits for an out made through `chain`: the last fielder records the
    /// putout and each other fielder one assist.
    ///
    /// A chain with an error produces no out. The error is charged and the
    /// fielders before it still earn assists.
    pub fn for_chain(chain: &[FieldingStep]) -> Self {
        let mut credits = FieldingCredits::default();
        if let Some(error_at) = chain.iter().position(FieldingStep::is_error) {
            for step in &chain[..error_at] {
                push_unique(&mut credits.assists, step.fielder());
            }
            for step in chain.iter().filter(|s| s.is_error()) {
                credits.errors.push(step.fielder());
            }
            return credits;
        }

        if let Some((last, rest)) = chain.split_last() {
            credits.putouts.push(last.fielder());
            for step in rest {
                push_unique(&mut credits.assists, step.fielder());
            }
        }
        credits
    }

    pub fn error(fielder: Fielder) -> Self {
        FieldingCredits {
            errors: vec![fielder],
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.putouts.is_empty() && self.assists.is_empty() && self.errors.is_empty()
    }

    /// Only the error charges
    pub fn errors_only(&self) -> Self {
        FieldingCredits {
            errors: self.errors.clone(),
            ..Default::default()
        }
    }

    pub fn merge(&mut self, other: FieldingCredits) {
        self.putouts.extend(other.putouts);
        for assist in other.assists {
            push_unique(&mut self.assists, assist);
        }
        self.errors.extend(other.errors);
    }
}

fn push_unique(fielders: &mut Vec<Fielder>, fielder: Fielder) {
    if !fielders.contains(&fielder) {
        fielders.push(fielder);
    }
}

/// How a runner leaves the play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Movement {
    Safe(Base),
    Out,
}

/// Movement implied for one runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplicitMove {
    pub runner: Runner,
    pub movement: Movement,
    pub credits: FieldingCredits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sacrifice {
    Hit,
    Fly,
}

/// Everything the primaries imply without an advance section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImplicitPlay {
    /// At most one move per runner, batter first
    pub moves: Vec<ImplicitMove>,
    /// Credit not tied to a runner's movement, e.g. a dropped foul fly
    pub credits: FieldingCredits,
    pub sacrifice: Option<Sacrifice>,
}

impl ImplicitPlay {
    pub fn move_for(&self, runner: Runner) -> Option<&ImplicitMove> {
        self.moves.iter().find(|m| m.runner == runner)
    }

    /// Record a move; a later primary replaces an earlier move for the same runner.
    fn set(&mut self, runner: Runner, movement: Movement, credits: FieldingCredits) {
        self.moves.retain(|m| m.runner != runner);
        self.moves.push(ImplicitMove {
            runner,
            movement,
            credits,
        });
        self.moves.sort_by_key(|m| m.runner.index());
    }

    fn batter(&mut self, movement: Movement, credits: FieldingCredits) {
        self.set(Runner::Batter, movement, credits);
    }
}

/// Derive the implicit movement of a play.
pub fn classify(descriptor: &PlayDescriptor) -> ImplicitPlay {
    let mut play = ImplicitPlay {
        sacrifice: sacrifice(&descriptor.modifiers),
        ..Default::default()
    };

    for primary in &descriptor.primaries {
        match primary {
            PlayKind::Single(_) => play.batter(Movement::Safe(Base::First), Default::default()),
            PlayKind::Double(_) | PlayKind::GroundRuleDouble(_) => {
                play.batter(Movement::Safe(Base::Second), Default::default())
            }
            PlayKind::Triple(_) => play.batter(Movement::Safe(Base::Third), Default::default()),
            PlayKind::HomeRun(_) => play.batter(Movement::Safe(Base::Home), Default::default()),
            PlayKind::Walk
            | PlayKind::IntentionalWalk
            | PlayKind::HitByPitch
            | PlayKind::CatcherInterference => {
                play.batter(Movement::Safe(Base::First), Default::default())
            }
            PlayKind::Error(fielder) => play.batter(
                Movement::Safe(Base::First),
                FieldingCredits::error(*fielder),
            ),
            PlayKind::FieldersChoice(Some(_)) => {
                play.batter(Movement::Safe(Base::First), Default::default())
            }
            // An uncredited fielder's choice is scored as the batter's out
            PlayKind::FieldersChoice(None) => play.batter(Movement::Out, Default::default()),
            PlayKind::Strikeout(steps) => strikeout(&mut play, steps),
            PlayKind::Out(segments) => out_chain(&mut play, segments),
            PlayKind::StolenBase(base) => {
                play.set(base.previous_runner(), Movement::Safe(*base), Default::default())
            }
            PlayKind::CaughtStealing { base, group }
            | PlayKind::PickoffCaughtStealing { base, group } => {
                caught(&mut play, base.previous_runner(), *base, group.as_ref())
            }
            PlayKind::Pickoff { runner, group } => pickoff(&mut play, *runner, group.as_ref()),
            PlayKind::FoulFlyError(fielder) => {
                play.credits.merge(FieldingCredits::error(*fielder))
            }
            PlayKind::WildPitch
            | PlayKind::PassedBall
            | PlayKind::Balk
            | PlayKind::DefensiveIndifference
            | PlayKind::OtherAdvance
            | PlayKind::NoPlay => {}
        }
    }

    play
}

fn sacrifice(modifiers: &[Modifier]) -> Option<Sacrifice> {
    modifiers.iter().find_map(|modifier| match modifier {
        Modifier::SacrificeHit => Some(Sacrifice::Hit),
        Modifier::SacrificeFly => Some(Sacrifice::Fly),
        _ => None,
    })
}

fn strikeout(play: &mut ImplicitPlay, steps: &[FieldingStep]) {
    if steps.is_empty() {
        let catcher = Fielder::new(2).into_iter().collect();
        play.batter(
            Movement::Out,
            FieldingCredits {
                putouts: catcher,
                ..Default::default()
            },
        );
    } else if steps.iter().any(FieldingStep::is_error) {
        play.batter(Movement::Safe(Base::First), FieldingCredits::for_chain(steps));
    } else {
        play.batter(Movement::Out, FieldingCredits::for_chain(steps));
    }
}

fn out_chain(play: &mut ImplicitPlay, segments: &[ChainSegment]) {
    let mut previous_last: Option<Fielder> = None;
    let mut batter_retired = false;

    for segment in segments {
        let runner = segment.runner.unwrap_or(Runner::Batter);

        // A continuing segment starts from whoever ended the previous one
        let mut chain = segment.steps.clone();
        if let Some(relay) = previous_last {
            if chain.first().map(FieldingStep::fielder) != Some(relay) {
                chain.insert(0, FieldingStep::Fielder(relay));
            }
        }
        previous_last = chain.last().map(FieldingStep::fielder);

        let credits = FieldingCredits::for_chain(&chain);
        if chain.iter().any(FieldingStep::is_error) {
            play.set(runner, Movement::Safe(runner.next_base()), credits);
        } else {
            play.set(runner, Movement::Out, credits);
            batter_retired |= runner == Runner::Batter;
        }
    }

    if !batter_retired && play.move_for(Runner::Batter).is_none() {
        play.batter(Movement::Safe(Base::First), Default::default());
    }
}

fn caught(play: &mut ImplicitPlay, runner: Runner, target: Base, group: Option<&FieldingGroup>) {
    let credits = group
        .map(|g| FieldingCredits::for_chain(&g.steps))
        .unwrap_or_default();
    if group.is_some_and(FieldingGroup::has_error) {
        play.set(runner, Movement::Safe(target), credits);
    } else {
        play.set(runner, Movement::Out, credits);
    }
}

fn pickoff(play: &mut ImplicitPlay, runner: Runner, group: Option<&FieldingGroup>) {
    let credits = group
        .map(|g| FieldingCredits::for_chain(&g.steps))
        .unwrap_or_default();
    if group.is_some_and(FieldingGroup::has_error) {
        // The runner stays put unless an advance says otherwise
        play.credits.merge(credits);
    } else {
        play.set(runner, Movement::Out, credits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::parser::parse;

    fn fielders(numbers: &[u8]) -> Vec<Fielder> {
        numbers.iter().filter_map(|n| Fielder::new(*n)).collect()
    }

    fn implicit(raw: &str) -> ImplicitPlay {
        classify(&parse(raw).unwrap())
    }

    #[test]
    fn test_hits_place_the_batter() {
        assert_eq!(
            implicit("S9").move_for(Runner::Batter).map(|m| m.movement),
            Some(Movement::Safe(Base::First))
        );
        assert_eq!(
            implicit("DGR").move_for(Runner::Batter).map(|m| m.movement),
            Some(Movement::Safe(Base::Second))
        );
        assert_eq!(
            implicit("HR/F7").move_for(Runner::Batter).map(|m| m.movement),
            Some(Movement::Safe(Base::Home))
        );
    }

    #[test]
    fn test_unassisted_ground_out() {
        let play = implicit("4");
        let batter = play.move_for(Runner::Batter).unwrap();
        assert_eq!(batter.movement, Movement::Out);
        assert_eq!(batter.credits.putouts, fielders(&[4]));
        assert!(batter.credits.assists.is_empty());
    }

    #[test]
    fn test_sacrifice_is_recorded() {
        let play = implicit("34/SH.2-3;1-2");
        assert_eq!(play.sacrifice, Some(Sacrifice::Hit));
        let batter = play.move_for(Runner::Batter).unwrap();
        assert_eq!(batter.credits.putouts, fielders(&[4]));
        assert_eq!(batter.credits.assists, fielders(&[3]));
    }

    #[test]
    fn test_double_play_relay() {
        let play = implicit("64(1)3/GDP");
        let runner = play.move_for(Runner::First).unwrap();
        assert_eq!(runner.movement, Movement::Out);
        assert_eq!(runner.credits.putouts, fielders(&[4]));
        assert_eq!(runner.credits.assists, fielders(&[6]));

        let batter = play.move_for(Runner::Batter).unwrap();
        assert_eq!(batter.movement, Movement::Out);
        assert_eq!(batter.credits.putouts, fielders(&[3]));
        assert_eq!(batter.credits.assists, fielders(&[4]));
    }

    #[test]
    fn test_force_out_puts_batter_on_first() {
        let play = implicit("54(1)/FO");
        assert_eq!(
            play.move_for(Runner::Batter).map(|m| m.movement),
            Some(Movement::Safe(Base::First))
        );
        assert_eq!(
            play.move_for(Runner::First).map(|m| m.movement),
            Some(Movement::Out)
        );
    }

    #[test]
    fn test_strikeout_credits() {
        let play = implicit("K");
        assert_eq!(
            play.move_for(Runner::Batter).unwrap().credits.putouts,
            fielders(&[2])
        );

        let play = implicit("K23");
        let batter = play.move_for(Runner::Batter).unwrap();
        assert_eq!(batter.credits.putouts, fielders(&[3]));
        assert_eq!(batter.credits.assists, fielders(&[2]));
    }

    #[test]
    fn test_uncredited_fielders_choice_is_an_out() {
        assert_eq!(
            implicit("FC").move_for(Runner::Batter).map(|m| m.movement),
            Some(Movement::Out)
        );
        assert_eq!(
            implicit("FC5").move_for(Runner::Batter).map(|m| m.movement),
            Some(Movement::Safe(Base::First))
        );
    }

    #[test]
    fn test_baserunning_plays() {
        let play = implicit("SB3;SB2");
        assert_eq!(
            play.move_for(Runner::Second).map(|m| m.movement),
            Some(Movement::Safe(Base::Third))
        );
        assert_eq!(
            play.move_for(Runner::First).map(|m| m.movement),
            Some(Movement::Safe(Base::Second))
        );
        assert!(play.move_for(Runner::Batter).is_none());

        let play = implicit("CS2(E2/TH)");
        let runner = play.move_for(Runner::First).unwrap();
        assert_eq!(runner.movement, Movement::Safe(Base::Second));
        assert_eq!(runner.credits.errors, fielders(&[2]));

        let play = implicit("PO1(E1)");
        assert!(play.moves.is_empty());
        assert_eq!(play.credits.errors, fielders(&[1]));
    }

    #[test]
    fn test_strikeout_with_stolen_base() {
        let play = implicit("K+SB2");
        assert_eq!(play.moves.len(), 2);
        assert_eq!(play.moves[0].runner, Runner::Batter);
        assert_eq!(play.moves[1].runner, Runner::First);
    }

    #[test]
    fn test_no_effect_plays() {
        for raw in ["WP.2-3", "BK.1-2", "NP", "FLE7"] {
            assert!(implicit(raw).moves.is_empty(), "{}", raw);
        }
    }
}
