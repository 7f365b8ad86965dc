//! Play descriptor types
//!
//! A [`PlayDescriptor`] is the structured form of one play field. It is built
//! by the parser and consumed by the classifier and resolver; its `Display`
//! implementation renders the canonical notation, which re-parses to an
//! equivalent descriptor.
//!
//! ```text
//! S8.3-H;2-H;1X3(8254)
//! │  └────────────────┴─ advances: 3-H, 2-H, 1X3 with fielder chain 8,2,5,4
//! └─ primaries: Single fielded by 8
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// A defensive position number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fielder(u8);

impl Fielder {
    /// Positions 1-9 are fielders; 10-12 only appear in lineup records.
    pub fn new(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn abbreviation(&self) -> &'static str {
        match self.0 {
            1 => "P",
            2 => "C",
            3 => "1B",
            4 => "2B",
            5 => "3B",
            6 => "SS",
            7 => "LF",
            8 => "CF",
            9 => "RF",
            10 => "DH",
            11 => "PH",
            _ => "PR",
        }
    }
}

impl fmt::Display for Fielder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a runner started the play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Runner {
    Batter,
    First,
    Second,
    Third,
}

impl Runner {
    pub const ALL: [Runner; 4] = [Runner::Batter, Runner::First, Runner::Second, Runner::Third];

    pub fn index(&self) -> usize {
        match self {
            Runner::Batter => 0,
            Runner::First => 1,
            Runner::Second => 2,
            Runner::Third => 3,
        }
    }

    /// The base this runner occupies before the play (none for the batter)
    pub fn base(&self) -> Option<Base> {
        match self {
            Runner::Batter => None,
            Runner::First => Some(Base::First),
            Runner::Second => Some(Base::Second),
            Runner::Third => Some(Base::Third),
        }
    }

    /// The base a forced runner is headed for
    pub fn next_base(&self) -> Base {
        match self {
            Runner::Batter => Base::First,
            Runner::First => Base::Second,
            Runner::Second => Base::Third,
            Runner::Third => Base::Home,
        }
    }
}

impl fmt::Display for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runner::Batter => write!(f, "B"),
            Runner::First => write!(f, "1"),
            Runner::Second => write!(f, "2"),
            Runner::Third => write!(f, "3"),
        }
    }
}

/// A destination base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Base {
    First,
    Second,
    Third,
    Home,
}

impl Base {
    /// The runner standing on this base before the play (none for home)
    pub fn runner(&self) -> Option<Runner> {
        match self {
            Base::First => Some(Runner::First),
            Base::Second => Some(Runner::Second),
            Base::Third => Some(Runner::Third),
            Base::Home => None,
        }
    }

    /// The runner who would be advancing into this base
    pub fn previous_runner(&self) -> Runner {
        match self {
            Base::First => Runner::Batter,
            Base::Second => Runner::First,
            Base::Third => Runner::Second,
            Base::Home => Runner::Third,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base::First => write!(f, "1"),
            Base::Second => write!(f, "2"),
            Base::Third => write!(f, "3"),
            Base::Home => write!(f, "H"),
        }
    }
}

/// One fielder touching the ball, or an error charged to one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldingStep {
    Fielder(Fielder),
    Error(Fielder),
}

impl FieldingStep {
    pub fn fielder(&self) -> Fielder {
        match self {
            FieldingStep::Fielder(f) | FieldingStep::Error(f) => *f,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldingStep::Error(_))
    }
}

impl fmt::Display for FieldingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldingStep::Fielder(fielder) => write!(f, "{}", fielder),
            FieldingStep::Error(fielder) => write!(f, "E{}", fielder),
        }
    }
}

fn write_steps(f: &mut fmt::Formatter<'_>, steps: &[FieldingStep]) -> fmt::Result {
    for step in steps {
        write!(f, "{}", step)?;
    }
    Ok(())
}

/// A parenthesised fielder chain attached to a baserunning play, e.g. `(26)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldingGroup {
    pub steps: Vec<FieldingStep>,
    pub throw: bool,
}

impl FieldingGroup {
    pub fn has_error(&self) -> bool {
        self.steps.iter().any(FieldingStep::is_error)
    }
}

impl fmt::Display for FieldingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_steps(f, &self.steps)?;
        if self.throw {
            write!(f, "/TH")?;
        }
        write!(f, ")")
    }
}

/// One segment of a ball-in-play out chain, e.g. `64(1)` in `64(1)3`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSegment {
    pub steps: Vec<FieldingStep>,
    /// Runner retired by this segment. Unmarked segments retire the batter
    /// when they close the chain; `(B)` names the batter explicitly.
    pub runner: Option<Runner>,
}

impl fmt::Display for ChainSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_steps(f, &self.steps)?;
        if let Some(runner) = self.runner {
            write!(f, "({})", runner)?;
        }
        Ok(())
    }
}

/// The basic play token describing the at-bat or baserunning result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlayKind {
    Single(Option<Fielder>),
    Double(Option<Fielder>),
    GroundRuleDouble(Option<Fielder>),
    Triple(Option<Fielder>),
    HomeRun(Option<Fielder>),
    Out(Vec<ChainSegment>),
    Walk,
    IntentionalWalk,
    HitByPitch,
    Strikeout(Vec<FieldingStep>),
    Error(Fielder),
    FieldersChoice(Option<Fielder>),
    CatcherInterference,
    FoulFlyError(Fielder),
    StolenBase(Base),
    CaughtStealing {
        base: Base,
        group: Option<FieldingGroup>,
    },
    Pickoff {
        runner: Runner,
        group: Option<FieldingGroup>,
    },
    PickoffCaughtStealing {
        base: Base,
        group: Option<FieldingGroup>,
    },
    WildPitch,
    PassedBall,
    Balk,
    DefensiveIndifference,
    OtherAdvance,
    NoPlay,
}

impl PlayKind {
    /// First base awarded to the batter, pushing forced runners along
    pub fn awards_first_base(&self) -> bool {
        matches!(
            self,
            PlayKind::Walk
                | PlayKind::IntentionalWalk
                | PlayKind::HitByPitch
                | PlayKind::CatcherInterference
        )
    }
}

fn write_optional_fielder(
    f: &mut fmt::Formatter<'_>,
    code: &str,
    fielder: &Option<Fielder>,
) -> fmt::Result {
    write!(f, "{}", code)?;
    if let Some(fielder) = fielder {
        write!(f, "{}", fielder)?;
    }
    Ok(())
}

fn write_optional_group(
    f: &mut fmt::Formatter<'_>,
    code: &str,
    group: &Option<FieldingGroup>,
) -> fmt::Result {
    write!(f, "{}", code)?;
    if let Some(group) = group {
        write!(f, "{}", group)?;
    }
    Ok(())
}

impl fmt::Display for PlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayKind::Single(fielder) => write_optional_fielder(f, "S", fielder),
            PlayKind::Double(fielder) => write_optional_fielder(f, "D", fielder),
            PlayKind::GroundRuleDouble(fielder) => write_optional_fielder(f, "DGR", fielder),
            PlayKind::Triple(fielder) => write_optional_fielder(f, "T", fielder),
            PlayKind::HomeRun(fielder) => write_optional_fielder(f, "HR", fielder),
            PlayKind::Out(segments) => {
                for segment in segments {
                    write!(f, "{}", segment)?;
                }
                Ok(())
            }
            PlayKind::Walk => write!(f, "W"),
            PlayKind::IntentionalWalk => write!(f, "IW"),
            PlayKind::HitByPitch => write!(f, "HP"),
            PlayKind::Strikeout(steps) => {
                write!(f, "K")?;
                write_steps(f, steps)
            }
            PlayKind::Error(fielder) => write!(f, "E{}", fielder),
            PlayKind::FieldersChoice(fielder) => write_optional_fielder(f, "FC", fielder),
            PlayKind::CatcherInterference => write!(f, "C"),
            PlayKind::FoulFlyError(fielder) => write!(f, "FLE{}", fielder),
            PlayKind::StolenBase(base) => write!(f, "SB{}", base),
            PlayKind::CaughtStealing { base, group } => {
                write_optional_group(f, &format!("CS{}", base), group)
            }
            PlayKind::Pickoff { runner, group } => {
                write_optional_group(f, &format!("PO{}", runner), group)
            }
            PlayKind::PickoffCaughtStealing { base, group } => {
                write_optional_group(f, &format!("POCS{}", base), group)
            }
            PlayKind::WildPitch => write!(f, "WP"),
            PlayKind::PassedBall => write!(f, "PB"),
            PlayKind::Balk => write!(f, "BK"),
            PlayKind::DefensiveIndifference => write!(f, "DI"),
            PlayKind::OtherAdvance => write!(f, "OA"),
            PlayKind::NoPlay => write!(f, "NP"),
        }
    }
}

/// Batted-ball trajectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Trajectory {
    GroundBall,
    LineDrive,
    Fly,
    Popup,
    BuntGrounder,
    BuntPopup,
    BuntLineDrive,
}

impl Trajectory {
    pub fn code(&self) -> &'static str {
        match self {
            Trajectory::GroundBall => "G",
            Trajectory::LineDrive => "L",
            Trajectory::Fly => "F",
            Trajectory::Popup => "P",
            Trajectory::BuntGrounder => "BG",
            Trajectory::BuntPopup => "BP",
            Trajectory::BuntLineDrive => "BL",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "G" => Some(Trajectory::GroundBall),
            "L" => Some(Trajectory::LineDrive),
            "F" => Some(Trajectory::Fly),
            "P" => Some(Trajectory::Popup),
            "BG" => Some(Trajectory::BuntGrounder),
            "BP" => Some(Trajectory::BuntPopup),
            "BL" => Some(Trajectory::BuntLineDrive),
            _ => None,
        }
    }
}

static TRAJECTORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(BG|BP|BL|G|L|F|P)([1-9][0-9A-Z+\-]*)?$").unwrap());

static HIT_LOCATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9][0-9A-Z+\-]*$").unwrap());

/// A flag after `/` describing the character of the play
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Modifier {
    SacrificeHit,
    SacrificeFly,
    ForceOut,
    DoublePlay,
    GroundBallDoublePlay,
    LineDriveDoublePlay,
    TriplePlay,
    Throw,
    Foul,
    InfieldFly,
    Interference,
    Trajectory {
        kind: Trajectory,
        location: Option<String>,
    },
    HitLocation(String),
    Other(String),
}

impl Modifier {
    /// Classify a modifier as it appears between slashes.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "SH" => return Modifier::SacrificeHit,
            "SF" => return Modifier::SacrificeFly,
            "FO" => return Modifier::ForceOut,
            "DP" => return Modifier::DoublePlay,
            "GDP" => return Modifier::GroundBallDoublePlay,
            "LDP" => return Modifier::LineDriveDoublePlay,
            "TP" => return Modifier::TriplePlay,
            "TH" => return Modifier::Throw,
            "FL" => return Modifier::Foul,
            "IF" => return Modifier::InfieldFly,
            "INT" => return Modifier::Interference,
            _ => {}
        }

        if let Some(caps) = TRAJECTORY.captures(raw) {
            if let Some(kind) = Trajectory::from_code(&caps[1]) {
                return Modifier::Trajectory {
                    kind,
                    location: caps.get(2).map(|m| m.as_str().to_string()),
                };
            }
        }

        if HIT_LOCATION.is_match(raw) {
            return Modifier::HitLocation(raw.to_string());
        }

        Modifier::Other(raw.to_string())
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::SacrificeHit => write!(f, "SH"),
            Modifier::SacrificeFly => write!(f, "SF"),
            Modifier::ForceOut => write!(f, "FO"),
            Modifier::DoublePlay => write!(f, "DP"),
            Modifier::GroundBallDoublePlay => write!(f, "GDP"),
            Modifier::LineDriveDoublePlay => write!(f, "LDP"),
            Modifier::TriplePlay => write!(f, "TP"),
            Modifier::Throw => write!(f, "TH"),
            Modifier::Foul => write!(f, "FL"),
            Modifier::InfieldFly => write!(f, "IF"),
            Modifier::Interference => write!(f, "INT"),
            Modifier::Trajectory { kind, location } => {
                write!(f, "{}{}", kind.code(), location.as_deref().unwrap_or(""))
            }
            Modifier::HitLocation(raw) | Modifier::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Notes attached to an advance in parentheses, e.g. `(UR)` or `(NR)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AdvanceAnnotation {
    Unearned,
    TeamUnearned,
    NoRbi,
    Rbi,
    WildPitch,
    PassedBall,
    Throw,
    Other(String),
}

impl AdvanceAnnotation {
    pub fn classify(raw: &str) -> Self {
        match raw {
            "UR" => AdvanceAnnotation::Unearned,
            "TUR" => AdvanceAnnotation::TeamUnearned,
            "NR" | "NORBI" => AdvanceAnnotation::NoRbi,
            "RBI" => AdvanceAnnotation::Rbi,
            "WP" => AdvanceAnnotation::WildPitch,
            "PB" => AdvanceAnnotation::PassedBall,
            "TH" => AdvanceAnnotation::Throw,
            other => AdvanceAnnotation::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AdvanceAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvanceAnnotation::Unearned => write!(f, "UR"),
            AdvanceAnnotation::TeamUnearned => write!(f, "TUR"),
            AdvanceAnnotation::NoRbi => write!(f, "NR"),
            AdvanceAnnotation::Rbi => write!(f, "RBI"),
            AdvanceAnnotation::WildPitch => write!(f, "WP"),
            AdvanceAnnotation::PassedBall => write!(f, "PB"),
            AdvanceAnnotation::Throw => write!(f, "TH"),
            AdvanceAnnotation::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Where an advance ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Destination {
    Safe(Base),
    OutAt(Base),
}

/// One runner (or batter) movement from the advance section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunnerAdvance {
    pub from: Runner,
    pub to: Base,
    pub is_out: bool,
    pub fielder_chain: Vec<FieldingStep>,
    /// Sorted and de-duplicated
    pub annotations: Vec<AdvanceAnnotation>,
}

impl RunnerAdvance {
    pub fn destination(&self) -> Destination {
        if self.is_out {
            Destination::OutAt(self.to)
        } else {
            Destination::Safe(self.to)
        }
    }

    pub fn has_annotation(&self, annotation: &AdvanceAnnotation) -> bool {
        self.annotations.contains(annotation)
    }
}

impl fmt::Display for RunnerAdvance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.is_out { "X" } else { "-" };
        write!(f, "{}{}{}", self.from, separator, self.to)?;

        let throw_in_chain =
            !self.fielder_chain.is_empty() && self.has_annotation(&AdvanceAnnotation::Throw);
        if !self.fielder_chain.is_empty() {
            write!(f, "(")?;
            write_steps(f, &self.fielder_chain)?;
            if throw_in_chain {
                write!(f, "/TH")?;
            }
            write!(f, ")")?;
        }
        for annotation in &self.annotations {
            if throw_in_chain && *annotation == AdvanceAnnotation::Throw {
                continue;
            }
            write!(f, "({})", annotation)?;
        }
        Ok(())
    }
}

/// The structured form of one play field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayDescriptor {
    pub raw_text: String,
    pub primaries: Vec<PlayKind>,
    pub modifiers: Vec<Modifier>,
    pub advances: Vec<RunnerAdvance>,
}

impl PlayDescriptor {
    /// The descriptor for an empty field or the `NP` sentinel
    pub fn no_play(raw: impl Into<String>) -> Self {
        Self {
            raw_text: raw.into(),
            primaries: vec![PlayKind::NoPlay],
            modifiers: Vec::new(),
            advances: Vec::new(),
        }
    }

    pub fn is_no_play(&self) -> bool {
        self.advances.is_empty() && self.primaries.iter().all(|p| *p == PlayKind::NoPlay)
    }

    pub fn has_modifier(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Explicit advance for a runner, if the notation names one
    pub fn advance_for(&self, runner: Runner) -> Option<&RunnerAdvance> {
        self.advances.iter().find(|a| a.from == runner)
    }

    /// Structural equality ignoring the original text
    pub fn is_equivalent(&self, other: &PlayDescriptor) -> bool {
        self.primaries == other.primaries
            && self.modifiers == other.modifiers
            && self.advances == other.advances
    }

    /// Canonical notation for this descriptor
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PlayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, primary) in self.primaries.iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", primary)?;
        }
        for modifier in &self.modifiers {
            write!(f, "/{}", modifier)?;
        }
        for (i, advance) in self.advances.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { "." } else { ";" }, advance)?;
        }
        Ok(())
    }
}
