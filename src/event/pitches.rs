//! Pitch counting from the pitch-sequence field
//!
//! The pitch field of a play row lists every pitch of the plate appearance so
//! far. When a plate appearance spans several rows (a stolen base mid at-bat,
//! say), the later row repeats the earlier pitches and marks the break with
//! `.`, so only the part after the last `.` is new.
//!
//! Some characters record events between pitches rather than pitches:
//! pickoff throws (`1`, `2`, `3`), a catcher's pickoff throw (`+`), the runner
//! going on the pitch (`>`), a pitch blocked by the catcher (`*`) and unknown
//! pitches (`?`). Those are stripped before counting.

use serde::{Deserialize, Serialize};

/// Characters that do not count as pitches
pub const DEFAULT_IGNORED: &str = "123+>*?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchCounter {
    ignored: String,
}

impl Default for PitchCounter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED)
    }
}

impl PitchCounter {
    pub fn new(ignored: impl Into<String>) -> Self {
        Self {
            ignored: ignored.into(),
        }
    }

    pub fn ignored(&self) -> &str {
        &self.ignored
    }

    /// Pitches in `field` that were not counted on an earlier row
    pub fn pitches_in(&self, field: &str) -> u32 {
        let new_part = field.rsplit('.').next().unwrap_or("");
        new_part
            .trim()
            .chars()
            .filter(|c| !self.ignored.contains(*c))
            .count() as u32
    }

    /// Running total after adding the pitches of `field`
    pub fn count(&self, field: &str, running_total: u32) -> u32 {
        running_total + self.pitches_in(field)
    }
}

/// [`PitchCounter::count`] with the default ignored characters
pub fn count(field: &str, running_total: u32) -> u32 {
    PitchCounter::default().count(field, running_total)
}
