use crate::{
    clock::TimeMs,
    error::{KeepsakeError, KeepsakeResult},
};

/// Identity of a scheduled timer; cancelling an already-fired or already
/// cancelled handle is a harmless no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug)]
enum Repeat {
    Once,
    Every(u64),
}

struct Entry<E> {
    handle: TimerHandle,
    due: TimeMs,
    repeat: Repeat,
    event: E,
}

/// Single-threaded cooperative timer queue.
///
/// Timers carry plain event values rather than closures, so firing never
/// re-enters component state: the host pops one due event at a time with
/// [`Scheduler::pop_due`] and dispatches it itself. A teardown performed
/// while handling an event cancels still-queued timers before they can fire,
/// which is the whole no-dangling-timers story.
///
/// Time only moves when the host advances it; nothing here reads a wall
/// clock. Due entries fire in (due time, creation order) order.
pub struct Scheduler<E> {
    now: TimeMs,
    next_id: u64,
    entries: Vec<Entry<E>>, // handful of timers at most; scanned linearly
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: TimeMs::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn now(&self) -> TimeMs {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fires `event` once, `delay_ms` after the current clock.
    pub fn schedule_once(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        self.push(self.now.saturating_add(delay_ms), Repeat::Once, event)
    }

    /// Fires `event` every `interval_ms` until cancelled.
    pub fn schedule_repeating(&mut self, interval_ms: u64, event: E) -> KeepsakeResult<TimerHandle> {
        if interval_ms == 0 {
            return Err(KeepsakeError::validation(
                "repeating timer interval must be > 0 ms",
            ));
        }
        Ok(self.push(
            self.now.saturating_add(interval_ms),
            Repeat::Every(interval_ms),
            event,
        ))
    }

    /// Removes a pending timer. Returns whether anything was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    /// Pops the earliest event due at or before `until`, advancing the clock
    /// to its due time so follow-up scheduling lands relative to that
    /// instant. Returns `None` once nothing is due in the window; finish
    /// with [`Scheduler::advance_clock`] to consume the remaining idle time.
    pub fn pop_due(&mut self, until: TimeMs) -> Option<E> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.handle.0))
            .map(|(i, _)| i)?;

        let due = self.entries[idx].due;
        if due > self.now {
            self.now = due;
        }

        match self.entries[idx].repeat {
            Repeat::Once => Some(self.entries.remove(idx).event),
            Repeat::Every(interval) => {
                let entry = &mut self.entries[idx];
                entry.due = due.saturating_add(interval);
                Some(entry.event.clone())
            }
        }
    }

    /// Moves the clock forward to `until` without firing anything.
    pub fn advance_clock(&mut self, until: TimeMs) {
        if until > self.now {
            self.now = until;
        }
    }

    /// Drains every event due through `until`, in order, then advances the
    /// clock. Convenience for hosts that do not interleave dispatch.
    pub fn advance_to(&mut self, until: TimeMs) -> Vec<E> {
        let mut fired = Vec::new();
        while let Some(event) = self.pop_due(until) {
            fired.push(event);
        }
        self.advance_clock(until);
        fired
    }

    fn push(&mut self, due: TimeMs, repeat: Repeat, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due,
            repeat,
            event,
        });
        handle
    }
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_then_creation_order() {
        let mut s: Scheduler<&str> = Scheduler::new();
        s.schedule_once(20, "b");
        s.schedule_once(10, "a");
        s.schedule_once(20, "c");
        assert_eq!(s.advance_to(TimeMs(30)), vec!["a", "b", "c"]);
        assert_eq!(s.now(), TimeMs(30));
        assert!(s.is_empty());
    }

    #[test]
    fn repeating_reschedules_until_cancelled() {
        let mut s: Scheduler<&str> = Scheduler::new();
        let h = s.schedule_repeating(10, "tick").unwrap();
        assert_eq!(s.advance_to(TimeMs(35)).len(), 3);
        assert!(s.cancel(h));
        assert!(s.advance_to(TimeMs(100)).is_empty());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut s: Scheduler<&str> = Scheduler::new();
        assert!(s.schedule_repeating(0, "x").is_err());
    }

    #[test]
    fn cancel_between_pops_prevents_fire() {
        let mut s: Scheduler<&str> = Scheduler::new();
        s.schedule_once(10, "first");
        let later = s.schedule_once(20, "second");
        assert_eq!(s.pop_due(TimeMs(50)), Some("first"));
        // The host reacts to "first" by tearing down whatever owned "second".
        s.cancel(later);
        assert_eq!(s.pop_due(TimeMs(50)), None);
    }

    #[test]
    fn pop_due_parks_clock_at_the_fired_instant() {
        let mut s: Scheduler<&str> = Scheduler::new();
        s.schedule_once(40, "late");
        assert_eq!(s.pop_due(TimeMs(100)), Some("late"));
        assert_eq!(s.now(), TimeMs(40));
        // Follow-up work lands relative to the fired instant.
        s.schedule_once(5, "follow-up");
        assert_eq!(s.pop_due(TimeMs(100)), Some("follow-up"));
        assert_eq!(s.now(), TimeMs(45));
    }

    #[test]
    fn cancelled_handle_is_a_noop_after_fire() {
        let mut s: Scheduler<&str> = Scheduler::new();
        let h = s.schedule_once(10, "x");
        assert_eq!(s.advance_to(TimeMs(10)), vec!["x"]);
        assert!(!s.cancel(h));
    }
}
