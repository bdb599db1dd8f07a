/// Top-level phase of the experience. Exactly one is active; transitions are
/// one-directional and Letter is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    Intro,
    Timeline,
    Letter,
}

/// Holds the current [`Stage`]. Advances are only valid from the immediately
/// preceding stage; anything else is logged and ignored rather than applied,
/// so a stray child completion signal can never skip or reverse a stage.
/// The sequencer itself never starts timers; it only reacts to completion
/// signals bubbled up by the active stage's driver.
#[derive(Clone, Debug)]
pub struct StageSequencer {
    stage: Stage,
}

impl StageSequencer {
    pub fn new() -> Self {
        Self {
            stage: Stage::Intro,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Intro -> Timeline. Returns whether the transition happened.
    pub fn advance_to_timeline(&mut self) -> bool {
        if self.stage != Stage::Intro {
            tracing::warn!(stage = ?self.stage, "ignoring out-of-order advance to timeline");
            return false;
        }
        self.stage = Stage::Timeline;
        tracing::debug!("stage advanced to timeline");
        true
    }

    /// Timeline -> Letter. Returns whether the transition happened.
    pub fn advance_to_letter(&mut self) -> bool {
        if self.stage != Stage::Timeline {
            tracing::warn!(stage = ?self.stage, "ignoring out-of-order advance to letter");
            return false;
        }
        self.stage = Stage::Letter;
        tracing::debug!("stage advanced to letter");
        true
    }
}

impl Default for StageSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_intro_timeline_letter() {
        let mut seq = StageSequencer::new();
        assert_eq!(seq.stage(), Stage::Intro);
        assert!(seq.advance_to_timeline());
        assert_eq!(seq.stage(), Stage::Timeline);
        assert!(seq.advance_to_letter());
        assert_eq!(seq.stage(), Stage::Letter);
    }

    #[test]
    fn skipping_ahead_is_ignored() {
        let mut seq = StageSequencer::new();
        assert!(!seq.advance_to_letter());
        assert_eq!(seq.stage(), Stage::Intro);
    }

    #[test]
    fn repeats_and_reversals_are_ignored() {
        let mut seq = StageSequencer::new();
        assert!(seq.advance_to_timeline());
        assert!(!seq.advance_to_timeline());
        assert!(seq.advance_to_letter());
        assert!(!seq.advance_to_letter());
        assert!(!seq.advance_to_timeline());
        assert_eq!(seq.stage(), Stage::Letter);
    }
}
