use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::dispatch::{DispatchOutcome, ImageDispatcher, TextDispatcher};
use super::presets::preset;
use super::state::{ImageSelection, SessionState, SessionView};
use super::transcript::ImageRef;
use super::verdict::Channel;
use crate::constants::{EMPTY_MESSAGE_PROMPT, PRESET_PROMPTS};
use crate::service::PredictionService;
use crate::utils::SkinChatError;

/// Owns the session state and routes user actions to the dispatchers.
///
/// Cheap to clone; clones share one session. The state lock is never held
/// across a network call, so the two channels can be in flight together and
/// their completions append to the transcript in completion order.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    text: TextDispatcher,
    image: ImageDispatcher,
}

impl SessionController {
    /// Start an empty session against `service`
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            text: TextDispatcher::new(service.clone()),
            image: ImageDispatcher::new(service),
        }
    }

    /// Render-ready copy of the current state
    pub fn snapshot(&self) -> SessionView {
        self.state.lock().view()
    }

    /// Run `f` against the live state without copying it
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn set_pending_text(&self, text: impl Into<String>) {
        self.state.lock().pending_text = text.into();
    }

    /// Edit the pending text in place (controlled-input echo)
    pub fn edit_pending_text(&self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.state.lock().pending_text);
    }

    /// Copy a suggested prompt verbatim into the pending text. Sends nothing.
    pub fn apply_preset(&self, index: usize) -> Result<&'static str, SkinChatError> {
        let prompt = preset(index).ok_or_else(|| {
            SkinChatError::Validation(format!(
                "Choose a suggestion between 1 and {}",
                PRESET_PROMPTS.len()
            ))
        })?;
        self.state.lock().pending_text = prompt.to_string();
        debug!(index, "preset copied into pending text");
        Ok(prompt)
    }

    /// Read an image from disk and make it the pending selection
    pub async fn select_image(&self, path: impl AsRef<Path>) -> Result<ImageRef, SkinChatError> {
        let selection = ImageSelection::load(path).await?;
        let reference = selection.reference.clone();
        self.state.lock().pending_image = Some(selection);
        info!(image = %reference.name, "image selected");
        Ok(reference)
    }

    pub fn clear_image_selection(&self) {
        self.state.lock().pending_image = None;
    }

    /// Send the pending text on the symptom chat channel
    pub async fn send_text(&self) -> DispatchOutcome {
        let (message, history) = {
            let mut state = self.state.lock();
            if state.text_in_flight {
                return busy(Channel::Text);
            }
            if state.pending_text.trim().is_empty() {
                return DispatchOutcome::Rejected {
                    prompt: EMPTY_MESSAGE_PROMPT.to_string(),
                };
            }
            state.text_in_flight = true;
            (
                state.pending_text.clone(),
                state.transcript.entries().to_vec(),
            )
        };

        info!(history = history.len(), "dispatching symptom message");
        let result = self.text.submit(&message, history).await;

        let mut state = self.state.lock();
        self.text.complete(&mut state, message, result)
    }

    /// Upload the pending image on the visual prediction channel
    pub async fn upload_image(&self) -> DispatchOutcome {
        let selection = {
            let mut state = self.state.lock();
            if state.image_in_flight {
                return busy(Channel::Image);
            }
            let selection = state.pending_image.clone();
            state.image_in_flight = selection.is_some();
            selection
        };

        if let Some(selection) = &selection {
            info!(image = %selection.reference.name, "dispatching image");
        }
        let result = self.image.submit(selection.as_ref()).await;

        let mut state = self.state.lock();
        self.image.complete(&mut state, result)
    }
}

fn busy(channel: Channel) -> DispatchOutcome {
    DispatchOutcome::Rejected {
        prompt: format!(
            "{} request still in progress, please wait.",
            channel.display_name()
        ),
    }
}
