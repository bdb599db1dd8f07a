use crate::{
    envelope::{EnvelopeState, EnvelopeVisual},
    stage::Stage,
    timeline::DateFields,
};

/// What the presentation layer reads after any state change. Exactly one of
/// the per-stage views is populated (matching the active [`Stage`]); the
/// core never queries the presentation layer back.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ViewState {
    pub stage: Stage,
    pub intro: Option<IntroView>,
    pub timeline: Option<TimelineView>,
    pub letter: Option<LetterView>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct IntroView {
    pub title: String,
    pub subtitle: String,
    /// "Tap to open" helper, hidden once the envelope starts opening.
    pub hint_visible: bool,
    /// Surrounding intro content fades while the envelope opens.
    pub surround_fading: bool,
    pub envelope_state: EnvelopeState,
    pub envelope: EnvelopeVisual,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineView {
    pub fields: DateFields,
    pub finished: bool,
    /// Present only once the roll has landed on the end instant.
    pub milestone_caption: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LetterView {
    pub title: String,
    /// Revealed prefix of the body, growing one scalar per tick.
    pub visible_body: String,
    pub signature: String,
    pub signature_visible: bool,
}
