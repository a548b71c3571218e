use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::state::{ImageSelection, SessionState};
use super::transcript::{ImageRef, TranscriptEntry};
use super::verdict::{interpret, Channel, Verdict};
use crate::constants::{
    CONNECTIVITY_FAILURE_MESSAGE, ERROR_MARKER, MISSING_IMAGE_PROMPT, NO_PREDICTION_NOTICE,
};
use crate::service::{ChatRequest, PredictionService, ServiceError, ServiceReply};

/// Why a dispatch produced no service reply
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("transport failure: {0}")]
    Transport(#[from] ServiceError),

    #[error("{0}")]
    Validation(String),
}

pub type DispatchResult<T = ServiceReply> = Result<T, DispatchError>;

/// A reply from the image channel, paired with the image it answers
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReply {
    pub reference: ImageRef,
    pub reply: ServiceReply,
}

/// What a dispatch did to the session, for status reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// A prediction was recorded and the channel verdict updated
    Answered { channel: Channel, verdict: Verdict },
    /// The service reported an error; it was recorded in the transcript
    ServiceError { message: String },
    /// The request did not complete; the connectivity message was recorded
    TransportFailed { channel: Channel },
    /// The reply carried no prediction; nothing was recorded
    NoPrediction { channel: Channel },
    /// Nothing was sent
    Rejected { prompt: String },
}

impl DispatchOutcome {
    /// One-line description for a status bar
    pub fn summary(&self) -> String {
        match self {
            Self::Answered { channel, verdict } => {
                format!("{}: {}", channel.display_name(), verdict)
            }
            Self::ServiceError { message } => format!("Service error: {}", message),
            Self::TransportFailed { channel } => format!(
                "{} request failed: {}",
                channel.display_name(),
                CONNECTIVITY_FAILURE_MESSAGE
            ),
            Self::NoPrediction { channel } => {
                format!("{}: {}", channel.display_name(), NO_PREDICTION_NOTICE)
            }
            Self::Rejected { prompt } => prompt.clone(),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::TransportFailed { .. })
    }
}

/// Request/response cycle of the symptom chat channel
#[derive(Clone)]
pub struct TextDispatcher {
    service: Arc<dyn PredictionService>,
}

impl TextDispatcher {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self { service }
    }

    /// One chat request carrying the message and the prior transcript
    pub async fn submit(&self, message: &str, history: Vec<TranscriptEntry>) -> DispatchResult {
        let request = ChatRequest {
            message: message.to_string(),
            history,
        };
        Ok(self.service.chat(&request).await?)
    }

    /// Fold a finished submit into the session and free the channel
    pub fn complete(
        &self,
        state: &mut SessionState,
        message: String,
        result: DispatchResult,
    ) -> DispatchOutcome {
        let outcome = match result {
            Ok(ServiceReply::Prediction(prediction)) => {
                let verdict = interpret(&prediction, Channel::Text);
                info!(label = %prediction.label, confidence = ?prediction.confidence, "symptom prediction received");
                state.text_verdict = Some(verdict.clone());
                state
                    .transcript
                    .append(TranscriptEntry::text(message, prediction.label));
                DispatchOutcome::Answered {
                    channel: Channel::Text,
                    verdict,
                }
            }
            Ok(ServiceReply::Error(error)) => {
                warn!(%error, "prediction service reported an error");
                state
                    .transcript
                    .append(TranscriptEntry::text(ERROR_MARKER, error.clone()));
                DispatchOutcome::ServiceError { message: error }
            }
            Ok(ServiceReply::Empty) => {
                warn!("chat reply carried neither a response nor an error");
                DispatchOutcome::NoPrediction {
                    channel: Channel::Text,
                }
            }
            Err(DispatchError::Transport(e)) => {
                warn!(error = %e, "symptom message did not reach the prediction service");
                state.transcript.append(TranscriptEntry::text(
                    ERROR_MARKER,
                    CONNECTIVITY_FAILURE_MESSAGE,
                ));
                DispatchOutcome::TransportFailed {
                    channel: Channel::Text,
                }
            }
            Err(DispatchError::Validation(prompt)) => DispatchOutcome::Rejected { prompt },
        };

        state.pending_text.clear();
        state.text_in_flight = false;
        outcome
    }
}

/// Request/response cycle of the image prediction channel
#[derive(Clone)]
pub struct ImageDispatcher {
    service: Arc<dyn PredictionService>,
}

impl ImageDispatcher {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self { service }
    }

    /// One multipart upload of the selected image.
    ///
    /// Without a selection nothing is sent.
    pub async fn submit(&self, selection: Option<&ImageSelection>) -> DispatchResult<ImageReply> {
        let selection =
            selection.ok_or_else(|| DispatchError::Validation(MISSING_IMAGE_PROMPT.to_string()))?;

        // Display reference exists before, and independently of, the upload
        let reference = selection.reference.clone();
        let reply = self.service.predict_image(&selection.upload()).await?;

        Ok(ImageReply { reference, reply })
    }

    /// Fold a finished submit into the session and free the channel
    pub fn complete(
        &self,
        state: &mut SessionState,
        result: DispatchResult<ImageReply>,
    ) -> DispatchOutcome {
        let outcome = match result {
            Ok(ImageReply {
                reference,
                reply: ServiceReply::Prediction(prediction),
            }) => {
                let verdict = interpret(&prediction, Channel::Image);
                info!(label = %prediction.label, confidence = ?prediction.confidence, "image prediction received");
                state.image_verdict = Some(verdict.clone());
                state
                    .transcript
                    .append(TranscriptEntry::image(reference, prediction.label));
                DispatchOutcome::Answered {
                    channel: Channel::Image,
                    verdict,
                }
            }
            Ok(ImageReply { reference, .. }) => {
                warn!(image = %reference.name, "image reply carried no prediction");
                DispatchOutcome::NoPrediction {
                    channel: Channel::Image,
                }
            }
            Err(DispatchError::Transport(e)) => {
                warn!(error = %e, "image did not reach the prediction service");
                state.transcript.append(TranscriptEntry::text(
                    ERROR_MARKER,
                    CONNECTIVITY_FAILURE_MESSAGE,
                ));
                DispatchOutcome::TransportFailed {
                    channel: Channel::Image,
                }
            }
            Err(DispatchError::Validation(prompt)) => DispatchOutcome::Rejected { prompt },
        };

        state.pending_image = None;
        state.image_in_flight = false;
        outcome
    }
}
