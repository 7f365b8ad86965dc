use crate::event::diagnostics::DecipherError;
use crate::event::parser::descriptor::*;
use crate::event::parser::parse;
use rstest::rstest;

fn fielder(n: u8) -> Fielder {
    Fielder::new(n).unwrap()
}

fn steps(numbers: &[u8]) -> Vec<FieldingStep> {
    numbers
        .iter()
        .map(|n| FieldingStep::Fielder(fielder(*n)))
        .collect()
}

#[test]
fn test_single_with_fielder() {
    let play = parse("S9").unwrap();
    assert_eq!(play.primaries, vec![PlayKind::Single(Some(fielder(9)))]);
    assert!(play.modifiers.is_empty());
    assert!(play.advances.is_empty());
}

#[test]
fn test_single_with_advance() {
    let play = parse("S7.1-2").unwrap();
    assert_eq!(play.primaries, vec![PlayKind::Single(Some(fielder(7)))]);
    assert_eq!(play.advances.len(), 1);
    let advance = &play.advances[0];
    assert_eq!(advance.from, Runner::First);
    assert_eq!(advance.destination(), Destination::Safe(Base::Second));
}

#[test]
fn test_sacrifice_with_two_advances() {
    let play = parse("34/SH.2-3;1-2").unwrap();
    assert_eq!(
        play.primaries,
        vec![PlayKind::Out(vec![ChainSegment {
            steps: steps(&[3, 4]),
            runner: None,
        }])]
    );
    assert!(play.has_modifier(&Modifier::SacrificeHit));
    assert_eq!(play.advances[0].from, Runner::Second);
    assert_eq!(play.advances[1].from, Runner::First);
}

#[test]
fn test_relay_out_on_advance() {
    let play = parse("S8.3-H;2-H;1X3(8254)").unwrap();
    assert_eq!(play.advances.len(), 3);
    let out = play.advance_for(Runner::First).unwrap();
    assert!(out.is_out);
    assert_eq!(out.destination(), Destination::OutAt(Base::Third));
    assert_eq!(out.fielder_chain, steps(&[8, 2, 5, 4]));
}

#[test]
fn test_error_in_advance_chain_negates_out() {
    let play = parse("S9.2X3(5E2)").unwrap();
    let advance = play.advance_for(Runner::Second).unwrap();
    assert!(!advance.is_out);
    assert_eq!(advance.destination(), Destination::Safe(Base::Third));
}

#[test]
fn test_advance_annotations() {
    let play = parse("D7.3-H(UR)(NR);1-3(TH)").unwrap();
    let scored = play.advance_for(Runner::Third).unwrap();
    assert!(scored.has_annotation(&AdvanceAnnotation::Unearned));
    assert!(scored.has_annotation(&AdvanceAnnotation::NoRbi));
    let throw = play.advance_for(Runner::First).unwrap();
    assert!(throw.has_annotation(&AdvanceAnnotation::Throw));
    assert!(throw.fielder_chain.is_empty());
}

#[test]
fn test_double_play_with_runner_markers() {
    let play = parse("64(1)3/GDP").unwrap();
    assert_eq!(
        play.primaries,
        vec![PlayKind::Out(vec![
            ChainSegment {
                steps: steps(&[6, 4]),
                runner: Some(Runner::First),
            },
            ChainSegment {
                steps: steps(&[3]),
                runner: None,
            },
        ])]
    );
    assert!(play.has_modifier(&Modifier::GroundBallDoublePlay));
}

#[test]
fn test_compound_primaries() {
    let play = parse("K+SB2").unwrap();
    assert_eq!(
        play.primaries,
        vec![PlayKind::Strikeout(vec![]), PlayKind::StolenBase(Base::Second)]
    );

    let play = parse("SB3;SB2").unwrap();
    assert_eq!(
        play.primaries,
        vec![
            PlayKind::StolenBase(Base::Third),
            PlayKind::StolenBase(Base::Second)
        ]
    );
}

#[test]
fn test_prefix_sharing_keywords() {
    assert_eq!(
        parse("POCS2(1361)").unwrap().primaries,
        vec![PlayKind::PickoffCaughtStealing {
            base: Base::Second,
            group: Some(FieldingGroup {
                steps: steps(&[1, 3, 6, 1]),
                throw: false,
            }),
        }]
    );
    assert_eq!(
        parse("PO1(E3)").unwrap().primaries,
        vec![PlayKind::Pickoff {
            runner: Runner::First,
            group: Some(FieldingGroup {
                steps: vec![FieldingStep::Error(fielder(3))],
                throw: false,
            }),
        }]
    );
    assert_eq!(parse("DGR").unwrap().primaries, vec![PlayKind::GroundRuleDouble(None)]);
    assert_eq!(parse("DI.1-2").unwrap().primaries, vec![PlayKind::DefensiveIndifference]);
    assert_eq!(parse("HP").unwrap().primaries, vec![PlayKind::HitByPitch]);
    assert_eq!(parse("H/F7").unwrap().primaries, vec![PlayKind::HomeRun(None)]);
    assert_eq!(parse("IW").unwrap().primaries, vec![PlayKind::IntentionalWalk]);
    assert_eq!(parse("WP.2-3").unwrap().primaries, vec![PlayKind::WildPitch]);
    assert_eq!(parse("FLE9").unwrap().primaries, vec![PlayKind::FoulFlyError(fielder(9))]);
    assert_eq!(parse("FC6").unwrap().primaries, vec![PlayKind::FieldersChoice(Some(fielder(6)))]);
}

#[test]
fn test_strikeout_with_dropped_third_strike_chain() {
    let play = parse("K23").unwrap();
    assert_eq!(play.primaries, vec![PlayKind::Strikeout(steps(&[2, 3]))]);
}

#[test]
fn test_modifiers_are_classified_and_deduplicated() {
    let play = parse("8/F78/F78/XYZ").unwrap();
    assert_eq!(
        play.modifiers,
        vec![
            Modifier::Trajectory {
                kind: Trajectory::Fly,
                location: Some("78".to_string())
            },
            Modifier::Other("XYZ".to_string()),
        ]
    );
}

#[test]
fn test_empty_and_sentinel_are_no_play() {
    assert!(parse("").unwrap().is_no_play());
    assert!(parse("   ").unwrap().is_no_play());
    assert!(parse("NP").unwrap().is_no_play());
}

#[test]
fn test_unknown_code() {
    match parse("ZZ4") {
        Err(DecipherError::UnknownPlayCode { code, .. }) => assert_eq!(code, "ZZ4"),
        other => panic!("expected unknown play code, got {:?}", other),
    }
}

#[test]
fn test_unrecorded_play_is_unknown() {
    for raw in ["99", "99/G"] {
        match parse(raw) {
            Err(DecipherError::UnknownPlayCode { code, .. }) => assert_eq!(code, "99"),
            other => panic!("expected unknown play code for {}, got {:?}", raw, other),
        }
    }
    // A real relay that happens to start in right field is still an out
    assert!(parse("93").is_ok());
    assert!(parse("9(1)9").is_ok());
}

#[test]
fn test_unknown_code_sharing_a_known_prefix() {
    match parse("SH/G") {
        Err(DecipherError::UnknownPlayCode { code, .. }) => assert_eq!(code, "SH"),
        other => panic!("expected unknown play code, got {:?}", other),
    }
}

#[rstest(
    raw,
    case("S7.1-5"),
    case("S7."),
    case("S7/G.1-"),
    case("S7,1-2"),
    case("64(1")
)]
fn test_syntax_errors(raw: &str) {
    match parse(raw) {
        Err(DecipherError::Syntax { raw: reported, .. }) => assert_eq!(reported, raw),
        other => panic!("expected syntax error for {:?}, got {:?}", raw, other),
    }
}

#[test]
fn test_render_round_trip() {
    for raw in [
        "S8.3-H;2-H;1X3(8254)",
        "64(1)3/GDP",
        "8(B)84(2)/LDP",
        "K+SB2",
        "CS2(E2/TH).1-3",
        "D7/L7LD.3-H(UR)(NR);B-3(E7/TH)",
        "HR/F89.2-H;1-H",
        "E6/G6.B-2",
    ] {
        let play = parse(raw).unwrap();
        let rendered = play.render();
        let reparsed = parse(&rendered).unwrap();
        assert!(
            play.is_equivalent(&reparsed),
            "{} rendered as {} did not round-trip",
            raw,
            rendered
        );
    }
}

#[test]
fn test_raw_text_is_kept_verbatim() {
    let play = parse(" W.1-2 ").unwrap();
    assert_eq!(play.raw_text, " W.1-2 ");
}
