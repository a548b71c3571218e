use bytes::Bytes;
use serde::Serialize;
use std::path::Path;

use super::transcript::{ImageRef, Transcript, TranscriptEntry};
use super::verdict::{Channel, Verdict};
use crate::service::ImageUpload;
use crate::utils::SkinChatError;

/// An image picked by the user and not yet uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSelection {
    pub reference: ImageRef,
    pub mime: String,
    pub bytes: Bytes,
}

impl ImageSelection {
    /// Read an image file from disk.
    ///
    /// Anything that is not a readable file with an `image/*` type is rejected.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SkinChatError> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            SkinChatError::Validation(format!("Cannot open {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(SkinChatError::Validation(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(SkinChatError::Validation(format!(
                "{} does not look like an image",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            SkinChatError::Validation(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            reference: ImageRef {
                name,
                path: path.to_path_buf(),
            },
            mime: mime.essence_str().to_string(),
            bytes: Bytes::from(bytes),
        })
    }

    pub fn upload(&self) -> ImageUpload {
        ImageUpload {
            file_name: self.reference.name.clone(),
            mime: self.mime.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

/// All conversation state for one session. Lives in memory only.
#[derive(Debug, Default)]
pub struct SessionState {
    pub(super) pending_text: String,
    pub(super) pending_image: Option<ImageSelection>,
    pub(super) transcript: Transcript,
    pub(super) text_verdict: Option<Verdict>,
    pub(super) image_verdict: Option<Verdict>,
    pub(super) text_in_flight: bool,
    pub(super) image_in_flight: bool,
}

impl SessionState {
    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    pub fn pending_image(&self) -> Option<&ImageSelection> {
        self.pending_image.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn verdict(&self, channel: Channel) -> Option<&Verdict> {
        match channel {
            Channel::Text => self.text_verdict.as_ref(),
            Channel::Image => self.image_verdict.as_ref(),
        }
    }

    pub fn in_flight(&self, channel: Channel) -> bool {
        match channel {
            Channel::Text => self.text_in_flight,
            Channel::Image => self.image_in_flight,
        }
    }

    /// Copy out everything a view needs to draw one frame
    pub fn view(&self) -> SessionView {
        SessionView {
            transcript: self.transcript.entries().to_vec(),
            text_verdict: self.text_verdict.clone(),
            image_verdict: self.image_verdict.clone(),
            pending_text: self.pending_text.clone(),
            pending_image: self.pending_image.as_ref().map(|s| s.reference.clone()),
            text_in_flight: self.text_in_flight,
            image_in_flight: self.image_in_flight,
        }
    }
}

/// Render-ready copy of the session state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub transcript: Vec<TranscriptEntry>,
    pub text_verdict: Option<Verdict>,
    pub image_verdict: Option<Verdict>,
    pub pending_text: String,
    pub pending_image: Option<ImageRef>,
    pub text_in_flight: bool,
    pub image_in_flight: bool,
}
