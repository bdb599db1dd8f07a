use crate::{
    clock::TimeMs,
    ease::Ease,
    error::{KeepsakeError, KeepsakeResult},
    timer::{Scheduler, TimerHandle},
    tween::Tween,
};

/// When the external "opened" notification fires, measured from the
/// interaction. Intentionally earlier than [`visual_duration_ms`]: the next
/// stage starts rendering underneath while the zoom is still playing, which
/// is what makes the hand-off feel seamless. `validate` keeps the two from
/// drifting apart.
pub const OPENED_NOTIFY_MS: u64 = 1_400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EnvelopeState {
    Closed,
    Opening,
}

/// Visual property driven by one cue of the open sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CueChannel {
    FlapRotation,
    SealOpacity,
    CardLift,
    EnvelopeDrop,
    EnvelopeZoom,
    EnvelopeOpacity,
}

/// One sub-animation of the open sequence, offset from the interaction.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    pub channel: CueChannel,
    pub offset_ms: u64,
    pub tween: Tween,
}

impl Cue {
    pub const fn end_ms(&self) -> u64 {
        self.offset_ms + self.tween.duration_ms
    }
}

/// The whole open sequence as data, sampled by one loop, so offsets and the
/// total visual length stay auditable in one place.
pub const OPEN_CUES: [Cue; 6] = [
    Cue {
        channel: CueChannel::FlapRotation,
        offset_ms: 0,
        tween: Tween::new(0.0, 180.0, 500, Ease::InOutCubic),
    },
    Cue {
        channel: CueChannel::SealOpacity,
        offset_ms: 0,
        tween: Tween::new(1.0, 0.0, 200, Ease::Linear),
    },
    Cue {
        channel: CueChannel::CardLift,
        offset_ms: 300,
        tween: Tween::new(0.0, -100.0, 600, Ease::InOutCubic),
    },
    Cue {
        channel: CueChannel::EnvelopeDrop,
        offset_ms: 600,
        tween: Tween::new(0.0, 100.0, 1_000, Ease::InQuad),
    },
    Cue {
        channel: CueChannel::EnvelopeZoom,
        offset_ms: 600,
        tween: Tween::new(
            1.0,
            35.0,
            1_500,
            Ease::Bezier {
                x1: 0.6,
                y1: 0.05,
                x2: -0.01,
                y2: 0.9,
            },
        ),
    },
    Cue {
        channel: CueChannel::EnvelopeOpacity,
        offset_ms: 1_800,
        tween: Tween::new(1.0, 0.0, 300, Ease::Linear),
    },
];

/// When the last cue stops moving, measured from the interaction.
pub fn visual_duration_ms() -> u64 {
    OPEN_CUES.iter().map(Cue::end_ms).max().unwrap_or(0)
}

/// The opened notification must land strictly inside the visual sequence.
pub fn validate() -> KeepsakeResult<()> {
    for cue in OPEN_CUES {
        if cue.tween.duration_ms == 0 {
            return Err(KeepsakeError::animation(format!(
                "open cue {:?} has zero duration",
                cue.channel
            )));
        }
    }
    if OPENED_NOTIFY_MS >= visual_duration_ms() {
        return Err(KeepsakeError::animation(
            "opened notification must fire before the open sequence finishes",
        ));
    }
    Ok(())
}

/// Channel values at a moment of the open sequence. Before the interaction
/// (and before each cue's offset) every channel sits at its rest value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EnvelopeVisual {
    pub flap_rotation_deg: f64,
    pub seal_opacity: f64,
    pub card_lift_px: f64,
    pub drop_px: f64,
    pub zoom: f64,
    pub opacity: f64,
}

impl EnvelopeVisual {
    pub const fn rest() -> Self {
        Self {
            flap_rotation_deg: 0.0,
            seal_opacity: 1.0,
            card_lift_px: 0.0,
            drop_px: 0.0,
            zoom: 1.0,
            opacity: 1.0,
        }
    }
}

/// Closed -> Opening, entered on the first interaction and never left.
/// Opening immediately tells the parent a transition has begun (the `true`
/// return of [`EnvelopeSequencer::open`], used to start fading surrounding
/// intro content) and arms the single early "opened" timer. Re-triggering
/// while already Opening is a no-op.
pub struct EnvelopeSequencer {
    state: EnvelopeState,
    opened_at: Option<TimeMs>,
    opened_timer: Option<TimerHandle>,
}

impl EnvelopeSequencer {
    pub fn new() -> Self {
        Self {
            state: EnvelopeState::Closed,
            opened_at: None,
            opened_timer: None,
        }
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// First interaction. Returns whether the open sequence started; `false`
    /// means it was already running and nothing was scheduled.
    pub fn open<E: Clone>(&mut self, scheduler: &mut Scheduler<E>, opened: E) -> bool {
        if self.state == EnvelopeState::Opening {
            return false;
        }
        self.state = EnvelopeState::Opening;
        self.opened_at = Some(scheduler.now());
        self.opened_timer = Some(scheduler.schedule_once(OPENED_NOTIFY_MS, opened));
        tracing::debug!("envelope opening");
        true
    }

    /// Samples every cue channel at `now`. Pure; rendering reads this.
    pub fn sample(&self, now: TimeMs) -> EnvelopeVisual {
        let mut visual = EnvelopeVisual::rest();
        let Some(opened_at) = self.opened_at else {
            return visual;
        };
        let elapsed = now.since(opened_at);
        for cue in OPEN_CUES {
            let value = cue.tween.sample(elapsed.saturating_sub(cue.offset_ms));
            match cue.channel {
                CueChannel::FlapRotation => visual.flap_rotation_deg = value,
                CueChannel::SealOpacity => visual.seal_opacity = value,
                CueChannel::CardLift => visual.card_lift_px = value,
                CueChannel::EnvelopeDrop => visual.drop_px = value,
                CueChannel::EnvelopeZoom => visual.zoom = value,
                CueChannel::EnvelopeOpacity => visual.opacity = value,
            }
        }
        visual
    }

    /// Cancels the pending opened notification, if any.
    pub fn teardown<E: Clone>(mut self, scheduler: &mut Scheduler<E>) {
        if let Some(handle) = self.opened_timer.take() {
            scheduler.cancel(handle);
        }
    }
}

impl Default for EnvelopeSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_table_is_valid() {
        validate().unwrap();
        assert_eq!(visual_duration_ms(), 2_100);
        assert!(OPENED_NOTIFY_MS < visual_duration_ms());
    }

    #[test]
    fn open_is_idempotent() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        let mut envelope = EnvelopeSequencer::new();
        assert!(envelope.open(&mut scheduler, "opened"));
        assert!(!envelope.open(&mut scheduler, "opened"));
        assert_eq!(envelope.state(), EnvelopeState::Opening);
        // Exactly one notification, at exactly the hand-off instant.
        assert!(scheduler.advance_to(TimeMs(OPENED_NOTIFY_MS - 1)).is_empty());
        assert_eq!(scheduler.advance_to(TimeMs(10_000)), vec!["opened"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn sample_before_interaction_is_at_rest() {
        let envelope = EnvelopeSequencer::new();
        assert_eq!(envelope.sample(TimeMs(5_000)), EnvelopeVisual::rest());
    }

    #[test]
    fn sample_tracks_the_cue_table() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        scheduler.advance_clock(TimeMs(500));
        let mut envelope = EnvelopeSequencer::new();
        envelope.open(&mut scheduler, "opened");

        // Halfway through the flap cue, ease-in-out-cubic is exactly 0.5.
        let mid_flap = envelope.sample(TimeMs(750));
        assert!((mid_flap.flap_rotation_deg - 90.0).abs() < 1e-9);
        // The zoom has not started yet at +250ms.
        assert_eq!(mid_flap.zoom, 1.0);
        assert_eq!(mid_flap.card_lift_px, 0.0);

        // Past the end, every channel rests at its target.
        let done = envelope.sample(TimeMs(500 + visual_duration_ms()));
        assert_eq!(done.flap_rotation_deg, 180.0);
        assert_eq!(done.seal_opacity, 0.0);
        assert_eq!(done.card_lift_px, -100.0);
        assert_eq!(done.drop_px, 100.0);
        assert_eq!(done.zoom, 35.0);
        assert_eq!(done.opacity, 0.0);
    }

    #[test]
    fn teardown_cancels_the_pending_notification() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        let mut envelope = EnvelopeSequencer::new();
        envelope.open(&mut scheduler, "opened");
        envelope.teardown(&mut scheduler);
        assert!(scheduler.advance_to(TimeMs(10_000)).is_empty());
    }
}
