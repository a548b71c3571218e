use anyhow::Result;
use futures::future::OptionFuture;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::{
    cli::OutputFormat,
    session::{DispatchOutcome, SessionController, SessionView, TranscriptEntry},
};

/// Result of a non-interactive run
#[derive(Debug, Serialize)]
pub struct NonInteractiveResult {
    /// Symptom description that was sent, if any
    pub message: Option<String>,
    /// Image that was uploaded, if any
    pub image: Option<PathBuf>,
    /// One outcome per dispatched channel
    pub outcomes: Vec<DispatchOutcome>,
    /// Session state after both channels finished
    pub session: SessionView,
    /// Prompts and failures worth surfacing
    pub errors: Vec<String>,
    /// Wall time for the whole run
    pub duration_ms: u128,
}

impl NonInteractiveResult {
    pub fn has_transport_failure(&self) -> bool {
        self.outcomes.iter().any(DispatchOutcome::is_transport_failure)
    }
}

/// Runs one symptom message and/or one image upload without a UI
pub struct NonInteractiveRunner {
    session: SessionController,
}

impl NonInteractiveRunner {
    pub fn new(session: SessionController) -> Self {
        Self { session }
    }

    /// Dispatch the requested channels concurrently and collect the result
    pub async fn execute(
        &self,
        message: Option<String>,
        image: Option<PathBuf>,
    ) -> Result<NonInteractiveResult> {
        let start_time = Instant::now();
        let mut errors = Vec::new();

        if let Some(path) = &image {
            if let Err(e) = self.session.select_image(path).await {
                errors.push(e.to_string());
            }
        }
        if let Some(text) = &message {
            self.session.set_pending_text(text.clone());
        }

        // Only the requested channels are dispatched
        let text_channel: OptionFuture<_> =
            message.as_ref().map(|_| self.session.send_text()).into();
        let image_channel: OptionFuture<_> =
            image.as_ref().map(|_| self.session.upload_image()).into();
        let (text_outcome, image_outcome) = tokio::join!(text_channel, image_channel);

        let outcomes: Vec<DispatchOutcome> =
            text_outcome.into_iter().chain(image_outcome).collect();
        for outcome in &outcomes {
            match outcome {
                DispatchOutcome::Answered { .. } => {}
                other => errors.push(other.summary()),
            }
        }

        Ok(NonInteractiveResult {
            message,
            image,
            outcomes,
            session: self.session.snapshot(),
            errors,
            duration_ms: start_time.elapsed().as_millis(),
        })
    }

    /// Format the result according to the output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text => {
                let mut output = String::new();
                for entry in &result.session.transcript {
                    let exchange = entry.render();
                    output.push_str(&format!("[You] {}\n", exchange.user));
                    output.push_str(&format!("[Assistant] {}\n\n", exchange.bot));
                }

                output.push_str("--- Verdicts ---\n");
                push_verdicts(&mut output, &result.session, |label, verdict| {
                    format!("{}: {}\n", label, verdict)
                });

                if !result.errors.is_empty() {
                    output.push_str("\n--- Errors ---\n");
                    for error in &result.errors {
                        output.push_str(&format!("• {}\n", error));
                    }
                }

                output
            }
            OutputFormat::Markdown => {
                let mut output = String::new();

                output.push_str("## Transcript\n\n");
                for entry in &result.session.transcript {
                    let exchange = entry.render();
                    let who = match entry {
                        TranscriptEntry::Image { .. } => "**You (image):**",
                        TranscriptEntry::Text { .. } => "**You:**",
                    };
                    output.push_str(&format!("{} {}\n\n", who, exchange.user));
                    output.push_str(&format!("> {}\n\n", exchange.bot));
                }

                output.push_str("## Verdicts\n\n");
                push_verdicts(&mut output, &result.session, |label, verdict| {
                    format!("- **{}**: {}\n", label, verdict)
                });
                output.push('\n');

                if !result.errors.is_empty() {
                    output.push_str("## Errors\n\n");
                    for error in &result.errors {
                        output.push_str(&format!("- {}\n", error));
                    }
                    output.push('\n');
                }

                output.push_str("---\n");
                output.push_str(&format!("*Duration: {}ms*\n", result.duration_ms));

                output
            }
        }
    }
}

fn push_verdicts(
    output: &mut String,
    view: &SessionView,
    line: impl Fn(&str, &str) -> String,
) {
    let verdicts = [
        ("Symptoms", view.text_verdict.as_ref()),
        ("Image", view.image_verdict.as_ref()),
    ];
    for (label, verdict) in verdicts {
        let text = verdict.map(|v| v.as_str()).unwrap_or("-");
        output.push_str(&line(label, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MockPredictionService, Prediction, ServiceError, ServiceReply};
    use std::io::Write;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_runs_both_channels() {
        let mut mock = MockPredictionService::new();
        mock.expect_chat()
            .times(1)
            .returning(|_| Ok(ServiceReply::Prediction(Prediction::new("Eczema", Some(85.5)))));
        mock.expect_predict_image()
            .times(1)
            .returning(|_| Err(ServiceError::Request("offline".to_string())));

        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png").unwrap();

        let runner = NonInteractiveRunner::new(SessionController::new(Arc::new(mock)));
        let result = runner
            .execute(
                Some("Red rash on arms".to_string()),
                Some(file.path().to_path_buf()),
            )
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.session.transcript.len(), 2);
        assert!(result.has_transport_failure());
        assert_eq!(result.errors.len(), 1);

        let text = runner.format_result(&result, OutputFormat::Text);
        assert!(text.contains("[You] Red rash on arms\n[Assistant] Eczema"));
        assert!(text.contains("Symptoms: Eczema (Confidence: 85.50%)"));
        assert!(text.contains("Image: -"));

        let json: serde_json::Value =
            serde_json::from_str(&runner.format_result(&result, OutputFormat::Json)).unwrap();
        assert_eq!(json["session"]["text_verdict"], "Eczema (Confidence: 85.50%)");
        assert_eq!(json["outcomes"][0]["outcome"], "answered");
    }

    #[tokio::test]
    async fn test_unreadable_image_is_reported_not_sent() {
        let mut mock = MockPredictionService::new();
        mock.expect_predict_image().never();

        let runner = NonInteractiveRunner::new(SessionController::new(Arc::new(mock)));
        let result = runner
            .execute(None, Some(PathBuf::from("/definitely/missing.png")))
            .await
            .unwrap();

        assert!(result.session.transcript.is_empty());
        assert!(!result.has_transport_failure());
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.outcomes[0], DispatchOutcome::Rejected { .. }));
    }
}
