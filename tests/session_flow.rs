use pretty_assertions::assert_eq;
use serde_json::json;
use skinchat::app::ServiceConfig;
use skinchat::constants::{
    CONNECTIVITY_FAILURE_MESSAGE, ERROR_MARKER, IMAGE_LOW_CONFIDENCE_DISCLAIMER,
};
use skinchat::runtime::connect;
use skinchat::session::{Channel, DispatchOutcome, TranscriptEntry};
use skinchat::Config;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(base_url: String) -> Config {
    Config {
        service: ServiceConfig {
            base_url,
            ..ServiceConfig::default()
        },
        ..Config::default()
    }
}

fn png_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("arm")
        .suffix(".png")
        .tempfile()
        .unwrap();
    file.write_all(b"\x89PNG fake body").unwrap();
    file
}

#[tokio::test]
async fn test_symptom_message_confident_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "Eczema", "confidence": 85.5})),
        )
        .mount(&server)
        .await;

    let session = connect(&config_for(server.uri())).unwrap();
    session.set_pending_text("Red rash on arms");
    let outcome = session.send_text().await;

    assert!(matches!(outcome, DispatchOutcome::Answered { channel: Channel::Text, .. }));
    let view = session.snapshot();
    assert_eq!(
        view.transcript,
        vec![TranscriptEntry::text("Red rash on arms", "Eczema")]
    );
    assert_eq!(
        view.text_verdict.as_ref().map(|v| v.as_str()),
        Some("Eczema (Confidence: 85.50%)")
    );
    assert!(view.pending_text.is_empty());
    assert!(!view.text_in_flight);
}

#[tokio::test]
async fn test_image_low_confidence_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict_image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"prediction": "Psoriasis", "confidence": 40.0})),
        )
        .mount(&server)
        .await;

    let session = connect(&config_for(server.uri())).unwrap();
    let file = png_file();
    let reference = session.select_image(file.path()).await.unwrap();
    let outcome = session.upload_image().await;

    assert!(matches!(outcome, DispatchOutcome::Answered { channel: Channel::Image, .. }));
    let view = session.snapshot();
    assert_eq!(
        view.transcript,
        vec![TranscriptEntry::image(reference, "Psoriasis")]
    );
    assert_eq!(
        view.image_verdict.as_ref().map(|v| v.as_str()),
        Some(IMAGE_LOW_CONFIDENCE_DISCLAIMER)
    );
    assert_eq!(view.text_verdict, None);
    assert_eq!(view.pending_image, None);
}

#[tokio::test]
async fn test_unreachable_service_records_error_entry() {
    let session = connect(&config_for("http://127.0.0.1:9".to_string())).unwrap();
    session.set_pending_text("itchy");

    let outcome = session.send_text().await;

    assert!(outcome.is_transport_failure());
    let view = session.snapshot();
    assert_eq!(
        view.transcript,
        vec![TranscriptEntry::text(ERROR_MARKER, CONNECTIVITY_FAILURE_MESSAGE)]
    );
    assert_eq!(view.text_verdict, None);
    assert!(!view.text_in_flight);
}

#[tokio::test]
async fn test_both_channels_run_together() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "Eczema", "confidence": 70.0}))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/predict_image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"prediction": "Milia", "confidence": 95.0})),
        )
        .mount(&server)
        .await;

    let session = connect(&config_for(server.uri())).unwrap();
    let file = png_file();
    session.select_image(file.path()).await.unwrap();
    session.set_pending_text("white bumps");

    let (text, image) = tokio::join!(session.send_text(), session.upload_image());
    assert!(matches!(text, DispatchOutcome::Answered { .. }));
    assert!(matches!(image, DispatchOutcome::Answered { .. }));

    // Appended in completion order: the delayed chat reply lands last
    let view = session.snapshot();
    assert_eq!(view.transcript.len(), 2);
    assert!(matches!(view.transcript[0], TranscriptEntry::Image { .. }));
    assert_eq!(view.transcript[1].bot_text(), "Eczema");
    assert_eq!(
        view.text_verdict.as_ref().map(|v| v.as_str()),
        Some("Eczema (Confidence: 70.00%)")
    );
    assert_eq!(
        view.image_verdict.as_ref().map(|v| v.as_str()),
        Some("Milia (Confidence: 95.00%)")
    );
}
