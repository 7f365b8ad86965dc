//! End-to-end scenarios: parse a play field and resolve it against a base state

use retrosheet::event::classifier::Sacrifice;
use retrosheet::event::parser::{Base, Modifier, Runner};
use retrosheet::event::testing::assert_outcome;
use retrosheet::event::{
    parse, resolve, BaseState, DiagnosticKind, GameState, PlayContext, Side,
};
use rstest::rstest;

fn bases(first: bool, second: bool, third: bool) -> BaseState {
    BaseState::new(first, second, third, 0).unwrap()
}

#[test]
fn single_to_right_with_empty_bases() {
    let descriptor = parse("S9").unwrap();
    let resolution = resolve(&descriptor, &BaseState::empty());
    assert!(resolution.diagnostics.is_empty());

    assert_outcome(&resolution.outcome)
        .for_play("S9")
        .outs(0)
        .runs(0)
        .batter_reached(Base::First)
        .bases(true, false, false)
        .half_inning_ended(false);
}

#[test]
fn single_moves_runner_from_first_to_second() {
    let descriptor = parse("S7.1-2").unwrap();
    let outcome = resolve(&descriptor, &bases(true, false, false)).outcome;

    assert_outcome(&outcome)
        .for_play("S7.1-2")
        .outs(0)
        .runs(0)
        .batter_reached(Base::First)
        .bases(true, true, false);
}

#[test]
fn sacrifice_bunt_advances_both_runners() {
    let descriptor = parse("34/SH.2-3;1-2").unwrap();
    assert!(descriptor.has_modifier(&Modifier::SacrificeHit));

    let outcome = resolve(&descriptor, &bases(true, true, false)).outcome;
    assert_outcome(&outcome)
        .for_play("34/SH.2-3;1-2")
        .outs(1)
        .runs(0)
        .batter_out()
        .bases(false, true, true)
        .putouts(&[4])
        .assists(&[3])
        .sacrifice(Some(Sacrifice::Hit));
}

#[test]
fn relay_cuts_down_runner_at_third() {
    let descriptor = parse("S8.3-H;2-H;1X3(8254)").unwrap();
    let thrown_out = descriptor.advance_for(Runner::First).unwrap();
    assert!(thrown_out.is_out);

    let outcome = resolve(&descriptor, &bases(true, true, true)).outcome;
    assert_outcome(&outcome)
        .for_play("S8.3-H;2-H;1X3(8254)")
        .outs(1)
        .runs(2)
        .batter_reached(Base::First)
        .bases(true, false, false)
        .putouts(&[4])
        .assists(&[8, 2, 5]);
}

#[test]
fn unassisted_ground_out() {
    let outcome = resolve(&parse("4").unwrap(), &BaseState::empty()).outcome;
    assert_outcome(&outcome)
        .for_play("4")
        .outs(1)
        .runs(0)
        .batter_out()
        .bases(false, false, false)
        .putouts(&[4])
        .assists(&[]);
}

#[test]
fn walk_forces_runner_to_second() {
    let outcome = resolve(&parse("W.1-2").unwrap(), &bases(true, false, false)).outcome;
    assert_outcome(&outcome)
        .for_play("W.1-2")
        .outs(0)
        .runs(0)
        .batter_reached(Base::First)
        .bases(true, true, false)
        .putouts(&[]);
}

#[rstest(
    raw,
    first,
    second,
    third,
    outs,
    runs,
    case("K", false, false, false, 1, 0),
    case("HR/F7", true, true, true, 0, 4),
    case("D7/L.2-H;1-3", true, true, false, 0, 1),
    case("T9.1-H", true, false, false, 0, 1),
    case("64(1)3/GDP", true, false, false, 2, 0),
    case("8/F.3-H", false, false, true, 1, 1),
    case("E6.1-2", true, false, false, 0, 0),
    case("SB2", true, false, false, 0, 0),
    case("CS2(24)", true, false, false, 1, 0),
    case("WP.3-H", false, false, true, 0, 1),
    case("NP", true, true, true, 0, 0)
)]
fn outs_and_runs(raw: &str, first: bool, second: bool, third: bool, outs: u8, runs: u8) {
    let descriptor = parse(raw).unwrap();
    let resolution = resolve(&descriptor, &bases(first, second, third));
    assert!(
        resolution.diagnostics.is_empty(),
        "{}: {:?}",
        raw,
        resolution.diagnostics
    );
    assert_outcome(&resolution.outcome)
        .for_play(raw)
        .outs(outs)
        .runs(runs);
}

#[test]
fn half_inning_totals_three_outs() {
    let plays = ["S9", "K", "64(1)3/GDP", "NP", "8/F"];
    let mut state = GameState::new("TST202404010");
    let context = PlayContext::new(1, Side::Visitor);

    let mut outs = 0;
    for raw in &plays[..3] {
        let report = state.apply_mut(raw, &context);
        assert!(report.diagnostics.is_empty(), "{}: {:?}", raw, report.diagnostics);
        outs += report.outcome.outs_added;
    }
    assert_eq!(outs, 3);

    // A no-play after the third out is accepted quietly
    let report = state.apply_mut(plays[3], &context);
    assert!(report.diagnostics.is_empty());

    // The home half starts with empty bases and no outs
    let report = state.apply_mut(plays[4], &PlayContext::new(1, Side::Home));
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.bases_before, BaseState::empty());
    assert_eq!(report.outcome.outs_added, 1);
}

#[test]
fn short_half_inning_is_reported() {
    let mut state = GameState::new("TST202404010");
    state.apply_mut("K", &PlayContext::new(1, Side::Visitor));
    let report = state.apply_mut("S9", &PlayContext::new(1, Side::Home));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(
        report.diagnostics[0].kind,
        DiagnosticKind::HalfInningOutMismatch
    );
}

#[test]
fn runs_accumulate_into_the_score() {
    let state = GameState::new("TST202404010");
    let visitor = PlayContext::new(1, Side::Visitor);

    let (state, _) = state.apply("HR/F7", &visitor);
    let (state, _) = state.apply("D8", &visitor);
    let (state, report) = state.apply("S9.2-H", &visitor);

    assert_eq!(report.half_runs, 2);
    assert_eq!(state.score().get(Side::Visitor), 2);
    assert_eq!(state.score().get(Side::Home), 0);
}
