/// Session management module - Gateway

mod controller;
mod dispatch;
mod presets;
mod state;
mod transcript;
mod verdict;

pub use controller::SessionController;
pub use dispatch::{
    DispatchError, DispatchOutcome, DispatchResult, ImageDispatcher, ImageReply, TextDispatcher,
};
pub use presets::{preset, presets};
pub use state::{ImageSelection, SessionState, SessionView};
pub use transcript::{ImageRef, RenderedExchange, Transcript, TranscriptEntry};
pub use verdict::{interpret, Channel, Verdict};
