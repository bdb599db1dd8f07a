use chrono::{DateTime, Datelike};

use crate::{
    clock::TimeMs,
    ease::Ease,
    error::KeepsakeResult,
    timer::{Scheduler, TimerHandle},
    tween::Tween,
};

/// 2024-12-14T00:00:00Z, unix milliseconds.
pub const START_INSTANT_MS: i64 = 1_734_134_400_000;
/// 2025-12-15T00:00:00Z, unix milliseconds.
pub const END_INSTANT_MS: i64 = 1_765_756_800_000;

/// Pause between the stage mounting and the roll starting.
pub const START_DELAY_MS: u64 = 1_000;
/// Wall-clock length of the full start -> end roll.
pub const ROLL_DURATION_MS: u64 = 6_000;
/// Pause after the end instant is reached, before notifying the parent.
pub const SETTLE_DELAY_MS: u64 = 2_000;
/// Update cadence while the roll is running.
pub const TICK_INTERVAL_MS: u64 = 16;

/// Slow start, fast middle, slow end.
pub const ROLL_EASE: Ease = Ease::Bezier {
    x1: 0.85,
    y1: 0.0,
    x2: 0.15,
    y2: 1.0,
};

/// Caption shown once the roll lands on the end instant.
pub const MILESTONE_CAPTION: &str = "365 days together";

/// Rendered counter fields: zero-padded day and month, four-digit year.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateFields {
    pub day: String,
    pub month: String,
    pub year: String,
}

/// Calendar decomposition of a unix-millisecond instant, UTC only.
pub fn date_fields(unix_ms: i64) -> DateFields {
    let dt = DateTime::from_timestamp_millis(unix_ms).unwrap_or(DateTime::UNIX_EPOCH);
    DateFields {
        day: format!("{:02}", dt.day()),
        month: format!("{:02}", dt.month()),
        year: format!("{:04}", dt.year()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Running,
    Finished { notified: bool },
}

/// Drives a continuous date value from [`START_INSTANT_MS`] to
/// [`END_INSTANT_MS`] over [`ROLL_DURATION_MS`] under [`ROLL_EASE`].
///
/// Lifecycle: `mount` arms the initial delay; the start event begins the
/// repeating tick; each tick resamples the instant (monotonically
/// non-decreasing); reaching the end instant flags finished, stops the tick
/// timer and arms the settle timer; the settle event reports completion
/// exactly once via [`DateDriver::settle`]. Teardown at any point cancels
/// whatever is pending, so nothing fires into a disposed stage.
pub struct DateDriver {
    phase: Phase,
    roll: Tween,
    started_at: Option<TimeMs>,
    instant_ms: i64,
    start_timer: Option<TimerHandle>,
    tick_timer: Option<TimerHandle>,
    settle_timer: Option<TimerHandle>,
}

impl DateDriver {
    /// Schedules the initial delay; `start` fires back into
    /// [`DateDriver::start`].
    pub fn mount<E: Clone>(scheduler: &mut Scheduler<E>, start: E) -> Self {
        let start_timer = scheduler.schedule_once(START_DELAY_MS, start);
        Self {
            phase: Phase::NotStarted,
            roll: Tween::new(
                START_INSTANT_MS as f64,
                END_INSTANT_MS as f64,
                ROLL_DURATION_MS,
                ROLL_EASE,
            ),
            started_at: None,
            instant_ms: START_INSTANT_MS,
            start_timer: Some(start_timer),
            tick_timer: None,
            settle_timer: None,
        }
    }

    /// Initial-delay timer fired: begin the roll. Double starts are ignored.
    pub fn start<E: Clone>(&mut self, scheduler: &mut Scheduler<E>, tick: E) -> KeepsakeResult<()> {
        if self.phase != Phase::NotStarted {
            return Ok(());
        }
        self.start_timer = None;
        self.started_at = Some(scheduler.now());
        self.tick_timer = Some(scheduler.schedule_repeating(TICK_INTERVAL_MS, tick)?);
        self.phase = Phase::Running;
        tracing::debug!("date roll started");
        Ok(())
    }

    /// Progression tick: resample the instant. On reaching the end instant,
    /// stop ticking and arm the settle timer with `settle`.
    pub fn tick<E: Clone>(&mut self, scheduler: &mut Scheduler<E>, settle: E) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(started_at) = self.started_at else {
            return;
        };
        let elapsed = scheduler.now().since(started_at);
        let sampled = self.roll.sample(elapsed) as i64;
        // The roll never moves backwards, whatever the curve does.
        self.instant_ms = self.instant_ms.max(sampled);

        if self.roll.finished(elapsed) {
            self.instant_ms = END_INSTANT_MS;
            self.phase = Phase::Finished { notified: false };
            if let Some(handle) = self.tick_timer.take() {
                scheduler.cancel(handle);
            }
            self.settle_timer = Some(scheduler.schedule_once(SETTLE_DELAY_MS, settle));
            tracing::debug!("date roll finished, settling");
        }
    }

    /// Settle timer fired. True exactly once; the parent should then advance
    /// the stage and tear this driver down.
    pub fn settle(&mut self) -> bool {
        if self.phase == (Phase::Finished { notified: false }) {
            self.settle_timer = None;
            self.phase = Phase::Finished { notified: true };
            return true;
        }
        false
    }

    /// True from the moment the end instant is reached (gates the milestone
    /// caption), before and after the settle delay.
    pub fn finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    pub fn instant_ms(&self) -> i64 {
        self.instant_ms
    }

    pub fn fields(&self) -> DateFields {
        date_fields(self.instant_ms)
    }

    /// Cancels every pending timer this driver owns.
    pub fn teardown<E: Clone>(mut self, scheduler: &mut Scheduler<E>) {
        for handle in [
            self.start_timer.take(),
            self.tick_timer.take(),
            self.settle_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_decompose_to_the_expected_calendar_dates() {
        let start = date_fields(START_INSTANT_MS);
        assert_eq!((start.day.as_str(), start.month.as_str(), start.year.as_str()), ("14", "12", "2024"));
        let end = date_fields(END_INSTANT_MS);
        assert_eq!((end.day.as_str(), end.month.as_str(), end.year.as_str()), ("15", "12", "2025"));
    }

    #[test]
    fn fields_are_zero_padded() {
        // 2025-01-05T00:00:00Z.
        let fields = date_fields(1_736_035_200_000);
        assert_eq!(fields.day, "05");
        assert_eq!(fields.month, "01");
        assert_eq!(fields.year, "2025");
    }

    #[test]
    fn roll_is_monotonic_across_sampled_fractions() {
        let roll = Tween::new(
            START_INSTANT_MS as f64,
            END_INSTANT_MS as f64,
            ROLL_DURATION_MS,
            ROLL_EASE,
        );
        let mut prev = START_INSTANT_MS;
        for step in 0..=200 {
            let elapsed = step * ROLL_DURATION_MS / 200;
            let v = roll.sample(elapsed) as i64;
            assert!(v >= prev);
            prev = v;
        }
        assert_eq!(prev, END_INSTANT_MS);
    }

    #[test]
    fn lifecycle_start_tick_settle() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        let mut driver = DateDriver::mount(&mut scheduler, "start");

        assert_eq!(scheduler.advance_to(TimeMs(START_DELAY_MS)), vec!["start"]);
        driver.start(&mut scheduler, "tick").unwrap();
        assert_eq!(driver.fields().year, "2024");

        // Drive ticks until the roll completes.
        let end_at = TimeMs(START_DELAY_MS + ROLL_DURATION_MS);
        while let Some(event) = scheduler.pop_due(end_at) {
            assert_eq!(event, "tick");
            driver.tick(&mut scheduler, "settle");
        }
        scheduler.advance_clock(end_at);
        assert!(driver.finished());
        assert_eq!(driver.instant_ms(), END_INSTANT_MS);
        assert_eq!(driver.fields().year, "2025");

        // Settle fires once, exactly SETTLE_DELAY_MS later.
        let settle_at = TimeMs(end_at.0 + SETTLE_DELAY_MS);
        assert!(scheduler.advance_to(TimeMs(settle_at.0 - 1)).is_empty());
        assert_eq!(scheduler.advance_to(settle_at), vec!["settle"]);
        assert!(driver.settle());
        assert!(!driver.settle());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn teardown_mid_roll_cancels_everything() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        let mut driver = DateDriver::mount(&mut scheduler, "start");
        scheduler.advance_to(TimeMs(START_DELAY_MS));
        driver.start(&mut scheduler, "tick").unwrap();

        // A few ticks in, the stage goes away.
        let mid = TimeMs(START_DELAY_MS + 1_000);
        while let Some(_event) = scheduler.pop_due(mid) {
            driver.tick(&mut scheduler, "settle");
        }
        scheduler.advance_clock(mid);
        driver.teardown(&mut scheduler);
        assert!(scheduler.is_empty());
        assert!(scheduler.advance_to(TimeMs(60_000)).is_empty());
    }

    #[test]
    fn settle_before_finish_is_ignored() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        let mut driver = DateDriver::mount(&mut scheduler, "start");
        assert!(!driver.settle());
        scheduler.advance_to(TimeMs(START_DELAY_MS));
        driver.start(&mut scheduler, "tick").unwrap();
        assert!(!driver.settle());
    }
}
