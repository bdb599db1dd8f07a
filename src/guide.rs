//! # Keepsake guide
//!
//! A walkthrough of how the pieces fit. If you are embedding the crate,
//! start with [`Experience`](crate::Experience); everything else is detail.
//!
//! ## The shape of the system
//!
//! Keepsake is a staged greeting card: an envelope you tap open, a rolling
//! date counter, and a letter that types itself out. Three facts drive the
//! whole design:
//!
//! 1. **Stages are one-directional.** [`Stage`](crate::Stage) moves
//!    Intro -> Timeline -> Letter and never back or past. The
//!    [`StageSequencer`](crate::StageSequencer) only reacts to completion
//!    signals from the active stage's driver; out-of-order signals are
//!    logged and dropped.
//! 2. **Time is explicit.** Nothing reads a wall clock. The host advances a
//!    [`Scheduler`](crate::Scheduler) (via
//!    [`Experience::advance_to`](crate::Experience::advance_to)) and timers
//!    fire as plain [`Event`](crate::Event) values, popped one at a time.
//!    This is why every timing property in the test suite runs on a
//!    simulated clock.
//! 3. **Teardown cancels.** Each driver owns its timer handles and cancels
//!    them when its stage ends. Because events are popped one at a time, a
//!    handler that tears a driver down removes that driver's queued timers
//!    before they can fire. No callback ever reaches disposed state.
//!
//! ## Rendering boundary
//!
//! The core never draws. After any change the host reads
//! [`Experience::snapshot`](crate::Experience::snapshot), a serializable
//! [`ViewState`](crate::ViewState) holding the active stage's channel
//! values: envelope cue channels during the intro, zero-padded date fields
//! during the timeline, the revealed body prefix during the letter.
//!
//! ## Timing map (all constants, all milliseconds)
//!
//! - Envelope open, from the tap: flap 0..500, seal fade 0..200, card lift
//!   300..900, drop 600..1600, zoom 600..2100, fade 1800..2100. The external
//!   "opened" hand-off fires at 1400 — deliberately before the visuals end,
//!   so the next stage renders underneath the tail of the zoom.
//!   [`envelope::validate`](crate::envelope::validate) pins the hand-off
//!   strictly inside the cue table's derived end.
//! - Date roll, from the stage mounting: 1000 of stillness, then 6000 of
//!   rolling 2024-12-14 -> 2025-12-15 under a slow-fast-slow bezier, then
//!   2000 of settling before the letter stage is signalled.
//! - Letter: one character every 30; the signature fades in past 90% of the
//!   body.

// Doc-only module.
