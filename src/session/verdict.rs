use serde::Serialize;
use std::fmt;

use crate::constants::{
    CONFIDENCE_THRESHOLD, IMAGE_LOW_CONFIDENCE_DISCLAIMER, TEXT_LOW_CONFIDENCE_DISCLAIMER,
};
use crate::service::Prediction;

/// One of the two independent prediction flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Text,
    Image,
}

impl Channel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "Symptoms",
            Self::Image => "Image",
        }
    }

    fn disclaimer(&self) -> &'static str {
        match self {
            Self::Text => TEXT_LOW_CONFIDENCE_DISCLAIMER,
            Self::Image => IMAGE_LOW_CONFIDENCE_DISCLAIMER,
        }
    }
}

/// Confidence-qualified summary of the latest prediction on a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Verdict(String);

impl Verdict {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map a prediction to its verdict.
///
/// Scores at or above the threshold pass. A missing score, or one outside
/// `[0, 100]`, never does.
pub fn interpret(prediction: &Prediction, channel: Channel) -> Verdict {
    match prediction.confidence {
        Some(confidence)
            if (0.0..=100.0).contains(&confidence) && confidence >= CONFIDENCE_THRESHOLD =>
        {
            Verdict(format!(
                "{} (Confidence: {:.2}%)",
                prediction.label, confidence
            ))
        }
        _ => Verdict(channel.disclaimer().to_string()),
    }
}
