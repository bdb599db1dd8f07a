#![forbid(unsafe_code)]

pub mod clock;
pub mod ease;
pub mod envelope;
pub mod error;
pub mod experience;
pub mod guide;
pub mod letter;
pub mod stage;
pub mod timeline;
pub mod timer;
pub mod tween;
pub mod view;

pub use clock::TimeMs;
pub use ease::Ease;
pub use envelope::{Cue, CueChannel, EnvelopeSequencer, EnvelopeState, EnvelopeVisual};
pub use error::{KeepsakeError, KeepsakeResult};
pub use experience::{Event, Experience};
pub use letter::{LetterContent, RevealDriver};
pub use stage::{Stage, StageSequencer};
pub use timeline::{DateDriver, DateFields};
pub use timer::{Scheduler, TimerHandle};
pub use tween::Tween;
pub use view::{IntroView, LetterView, TimelineView, ViewState};
