use crate::constants::{MATCH_LENGTH_FRAMES, MID_PHASE_START};

/// Match-time mode. Derived once per frame and handed to every entity that
/// behaves differently over the course of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Spread bursts, bombs despawn at the arena edge.
    Early,
    /// Randomized bombs that reflect off the arena edge.
    Mid,
    /// Past the clear checkpoint (endless matches only): single aimed bombs.
    Late,
}

impl Phase {
    pub fn at(frame: u64) -> Self {
        if frame < MID_PHASE_START {
            Phase::Early
        } else if frame < MATCH_LENGTH_FRAMES {
            Phase::Mid
        } else {
            Phase::Late
        }
    }

    pub fn is_randomized(&self) -> bool {
        matches!(self, Phase::Mid)
    }
}
