use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::session::TranscriptEntry;

/// JSON body of a chat request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// Full transcript at the time of dispatch, for conversational context
    pub history: Vec<TranscriptEntry>,
}

/// An image ready to be sent as a multipart file part
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// A predicted label and the score the service attached to it
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Score in `[0, 100]`; `None` when the service did not report one
    pub confidence: Option<f64>,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// What a successful, decodable reply carried
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceReply {
    Prediction(Prediction),
    /// The service reported a semantic failure
    Error(String),
    /// Neither a prediction nor an error was present
    Empty,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponseBody {
    response: Option<String>,
    confidence: Option<f64>,
    error: Option<String>,
}

impl From<ChatResponseBody> for ServiceReply {
    fn from(body: ChatResponseBody) -> Self {
        match (body.response, body.error) {
            (Some(label), _) => ServiceReply::Prediction(Prediction::new(label, body.confidence)),
            (None, Some(error)) => ServiceReply::Error(error),
            (None, None) => ServiceReply::Empty,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageResponseBody {
    prediction: Option<String>,
    confidence: Option<f64>,
}

impl From<ImageResponseBody> for ServiceReply {
    fn from(body: ImageResponseBody) -> Self {
        match body.prediction {
            Some(label) => ServiceReply::Prediction(Prediction::new(label, body.confidence)),
            None => ServiceReply::Empty,
        }
    }
}
