use crate::{
    error::KeepsakeResult,
    timer::{Scheduler, TimerHandle},
};

/// One typewriter step per interval.
pub const REVEAL_INTERVAL_MS: u64 = 30;
/// Fraction of the body that must be revealed before the signature shows.
pub const SIGNATURE_THRESHOLD: f64 = 0.9;

/// The letter, replaced wholesale by an edit; fields are never mutated in
/// place one at a time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LetterContent {
    pub title: String,
    pub body: String,
    pub signature: String,
}

impl Default for LetterContent {
    fn default() -> Self {
        Self {
            title: "My dearest,".to_string(),
            body: "A whole year has passed since we began, and I am so glad to still be \
                   walking beside you. You are my best friend and an extraordinary companion.\n\n\
                   I keep every moment we have shared close to my heart, and I hope to gather \
                   many more of them with you.\n\n\
                   Happy anniversary, my love."
                .to_string(),
            signature: "Always yours".to_string(),
        }
    }
}

/// Discrete typewriter reveal: an index into the body (in Unicode scalars)
/// that climbs by one per tick until it covers the whole body, then stops
/// scheduling. Purely cosmetic, so there is no completion signal. Replacing
/// the content resets the index to zero and restarts the ticking.
pub struct RevealDriver {
    body_len: usize, // chars, not bytes
    index: usize,
    timer: Option<TimerHandle>,
}

impl RevealDriver {
    pub fn mount<E: Clone>(
        scheduler: &mut Scheduler<E>,
        tick: E,
        body: &str,
    ) -> KeepsakeResult<Self> {
        let body_len = body.chars().count();
        let timer = if body_len > 0 {
            Some(scheduler.schedule_repeating(REVEAL_INTERVAL_MS, tick)?)
        } else {
            None
        };
        Ok(Self {
            body_len,
            index: 0,
            timer,
        })
    }

    /// One typewriter step. Stops its own timer once the body is fully out.
    pub fn tick<E: Clone>(&mut self, scheduler: &mut Scheduler<E>) {
        if self.index < self.body_len {
            self.index += 1;
        }
        if self.index >= self.body_len {
            self.stop(scheduler);
        }
    }

    /// Content was replaced: restart the reveal from the top of `body`.
    pub fn reset<E: Clone>(
        &mut self,
        scheduler: &mut Scheduler<E>,
        tick: E,
        body: &str,
    ) -> KeepsakeResult<()> {
        self.stop(scheduler);
        self.body_len = body.chars().count();
        self.index = 0;
        if self.body_len > 0 {
            self.timer = Some(scheduler.schedule_repeating(REVEAL_INTERVAL_MS, tick)?);
        }
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn done(&self) -> bool {
        self.index >= self.body_len
    }

    /// Soft threshold, not a completion event: visible once the index
    /// exceeds 90% of the body length.
    pub fn signature_visible(&self) -> bool {
        self.index as f64 > self.body_len as f64 * SIGNATURE_THRESHOLD && self.body_len > 0
    }

    /// The currently revealed prefix of `body`, by Unicode scalar count.
    pub fn visible_prefix(&self, body: &str) -> String {
        body.chars().take(self.index).collect()
    }

    pub fn teardown<E: Clone>(mut self, scheduler: &mut Scheduler<E>) {
        self.stop(scheduler);
    }

    fn stop<E: Clone>(&mut self, scheduler: &mut Scheduler<E>) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
    }
}
