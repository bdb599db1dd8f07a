use crate::{
    clock::TimeMs,
    envelope::{self, EnvelopeSequencer, EnvelopeState},
    error::KeepsakeResult,
    letter::{LetterContent, RevealDriver},
    stage::{Stage, StageSequencer},
    timeline::{DateDriver, MILESTONE_CAPTION},
    timer::Scheduler,
    view::{IntroView, LetterView, TimelineView, ViewState},
};

pub const INTRO_TITLE: &str = "For my love";
pub const INTRO_SUBTITLE: &str = "On our anniversary";
pub const OPEN_HINT: &str = "Tap to open";

/// Timer payloads routed back into the experience's dispatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    EnvelopeOpened,
    TimelineStart,
    TimelineTick,
    TimelineSettled,
    RevealTick,
}

/// Root composition: one scheduler, one stage sequencer, and at most one
/// live per-stage driver. Configuration flows down (content, event values);
/// completion flows up (events popped from the scheduler). A stage
/// transition tears the previous driver down, cancelling its timers, so no
/// callback ever lands in disposed state; the torn-down stage's sub-state is
/// dropped, not carried forward.
///
/// The host drives everything by calling [`Experience::advance_to`] with the
/// current time (real or simulated) and rendering [`Experience::snapshot`].
pub struct Experience {
    scheduler: Scheduler<Event>,
    stages: StageSequencer,
    envelope: Option<EnvelopeSequencer>,
    timeline: Option<DateDriver>,
    reveal: Option<RevealDriver>,
    letter: LetterContent,
}

impl Experience {
    pub fn new() -> KeepsakeResult<Self> {
        Self::with_letter(LetterContent::default())
    }

    pub fn with_letter(letter: LetterContent) -> KeepsakeResult<Self> {
        envelope::validate()?;
        Ok(Self {
            scheduler: Scheduler::new(),
            stages: StageSequencer::new(),
            envelope: Some(EnvelopeSequencer::new()),
            timeline: None,
            reveal: None,
            letter,
        })
    }

    pub fn now(&self) -> TimeMs {
        self.scheduler.now()
    }

    pub fn stage(&self) -> Stage {
        self.stages.stage()
    }

    pub fn letter(&self) -> &LetterContent {
        &self.letter
    }

    /// Pending timers across all live drivers. Zero after a shutdown.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// The viewer's one interaction: tap the envelope. Returns whether the
    /// open sequence started; re-taps while opening (or after the intro is
    /// gone) do nothing.
    pub fn open_envelope(&mut self) -> bool {
        if self.stages.stage() != Stage::Intro {
            return false;
        }
        match self.envelope.as_mut() {
            Some(env) => env.open(&mut self.scheduler, Event::EnvelopeOpened),
            None => false,
        }
    }

    /// Advances the simulated clock to `now`, firing due timers one at a
    /// time so each handler sees (and may cancel) everything scheduled
    /// after it.
    pub fn advance_to(&mut self, now: TimeMs) -> KeepsakeResult<()> {
        while let Some(event) = self.scheduler.pop_due(now) {
            self.dispatch(event)?;
        }
        self.scheduler.advance_clock(now);
        Ok(())
    }

    /// Replaces the letter wholesale. Mid-reveal, this restarts the
    /// typewriter from the top of the new body.
    pub fn set_letter(&mut self, letter: LetterContent) -> KeepsakeResult<()> {
        self.letter = letter;
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.reset(&mut self.scheduler, Event::RevealTick, &self.letter.body)?;
        }
        Ok(())
    }

    /// Tears down whatever is live and cancels every pending timer.
    pub fn shutdown(&mut self) {
        if let Some(env) = self.envelope.take() {
            env.teardown(&mut self.scheduler);
        }
        if let Some(driver) = self.timeline.take() {
            driver.teardown(&mut self.scheduler);
        }
        if let Some(reveal) = self.reveal.take() {
            reveal.teardown(&mut self.scheduler);
        }
    }

    /// Current renderable state; pure, reads nothing back from the host.
    pub fn snapshot(&self) -> ViewState {
        let now = self.scheduler.now();
        ViewState {
            stage: self.stages.stage(),
            intro: self.envelope.as_ref().map(|env| IntroView {
                title: INTRO_TITLE.to_string(),
                subtitle: INTRO_SUBTITLE.to_string(),
                hint_visible: env.state() == EnvelopeState::Closed,
                surround_fading: env.state() == EnvelopeState::Opening,
                envelope_state: env.state(),
                envelope: env.sample(now),
            }),
            timeline: self.timeline.as_ref().map(|driver| TimelineView {
                fields: driver.fields(),
                finished: driver.finished(),
                milestone_caption: driver
                    .finished()
                    .then(|| MILESTONE_CAPTION.to_string()),
            }),
            letter: self.reveal.as_ref().map(|reveal| LetterView {
                title: self.letter.title.clone(),
                visible_body: reveal.visible_prefix(&self.letter.body),
                signature: self.letter.signature.clone(),
                signature_visible: reveal.signature_visible(),
            }),
        }
    }

    fn dispatch(&mut self, event: Event) -> KeepsakeResult<()> {
        match event {
            Event::EnvelopeOpened => {
                if !self.stages.advance_to_timeline() {
                    return Ok(());
                }
                // The intro's sub-state dies with it; the zoom keeps playing
                // only in the viewer's memory.
                if let Some(env) = self.envelope.take() {
                    env.teardown(&mut self.scheduler);
                }
                self.timeline = Some(DateDriver::mount(
                    &mut self.scheduler,
                    Event::TimelineStart,
                ));
            }
            Event::TimelineStart => {
                if let Some(driver) = self.timeline.as_mut() {
                    driver.start(&mut self.scheduler, Event::TimelineTick)?;
                }
            }
            Event::TimelineTick => {
                if let Some(driver) = self.timeline.as_mut() {
                    driver.tick(&mut self.scheduler, Event::TimelineSettled);
                }
            }
            Event::TimelineSettled => {
                let settled = self
                    .timeline
                    .as_mut()
                    .is_some_and(|driver| driver.settle());
                if !settled || !self.stages.advance_to_letter() {
                    return Ok(());
                }
                if let Some(driver) = self.timeline.take() {
                    driver.teardown(&mut self.scheduler);
                }
                self.reveal = Some(RevealDriver::mount(
                    &mut self.scheduler,
                    Event::RevealTick,
                    &self.letter.body,
                )?);
            }
            Event::RevealTick => {
                if let Some(reveal) = self.reveal.as_mut() {
                    reveal.tick(&mut self.scheduler);
                }
            }
        }
        Ok(())
    }
}
