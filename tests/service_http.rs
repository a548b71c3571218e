use serde_json::json;
use skinchat::app::ServiceConfig;
use skinchat::service::{
    ChatRequest, HttpPredictionService, ImageUpload, Prediction, PredictionService, ServiceError,
    ServiceReply,
};
use skinchat::session::TranscriptEntry;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> HttpPredictionService {
    let config = ServiceConfig {
        base_url: server.uri(),
        ..ServiceConfig::default()
    };
    HttpPredictionService::new(&config).expect("client build")
}

fn png_upload() -> ImageUpload {
    ImageUpload {
        file_name: "arm.png".to_string(),
        mime: "image/png".to_string(),
        bytes: bytes::Bytes::from_static(b"\x89PNG fake body"),
    }
}

#[tokio::test]
async fn test_chat_posts_message_and_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "message": "and now it is spreading",
            "history": [
                {"kind": "text", "userText": "Red rash on arms", "botText": "Eczema (Confidence: 85.50%)"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "Eczema", "confidence": 91.0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest {
        message: "and now it is spreading".to_string(),
        history: vec![TranscriptEntry::text(
            "Red rash on arms",
            "Eczema (Confidence: 85.50%)",
        )],
    };

    let reply = service_for(&server).chat(&request).await.expect("chat reply");
    assert_eq!(
        reply,
        ServiceReply::Prediction(Prediction::new("Eczema", Some(91.0)))
    );
}

#[tokio::test]
async fn test_chat_error_body_is_semantic_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "model offline"})))
        .mount(&server)
        .await;

    let request = ChatRequest {
        message: "itchy".to_string(),
        history: Vec::new(),
    };

    let reply = service_for(&server).chat(&request).await.expect("chat reply");
    assert_eq!(reply, ServiceReply::Error("model offline".to_string()));
}

#[tokio::test]
async fn test_non_success_status_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "No message provided"})))
        .mount(&server)
        .await;

    let request = ChatRequest {
        message: "itchy".to_string(),
        history: Vec::new(),
    };

    let err = service_for(&server).chat(&request).await.unwrap_err();
    assert!(matches!(err, ServiceError::Status { .. }));
}

#[tokio::test]
async fn test_malformed_body_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict_image"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .predict_image(&png_upload())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Decode { .. }));
}

#[tokio::test]
async fn test_image_is_sent_as_file_part() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict_image"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"arm.png\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"prediction": "Psoriasis", "confidence": 40.0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = service_for(&server)
        .predict_image(&png_upload())
        .await
        .expect("image reply");
    assert_eq!(
        reply,
        ServiceReply::Prediction(Prediction::new("Psoriasis", Some(40.0)))
    );
}

#[tokio::test]
async fn test_missing_prediction_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict_image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"confidence": 12.0})))
        .mount(&server)
        .await;

    let reply = service_for(&server)
        .predict_image(&png_upload())
        .await
        .expect("image reply");
    assert_eq!(reply, ServiceReply::Empty);
}

#[tokio::test]
async fn test_unreachable_service_is_connect_failure() {
    let config = ServiceConfig {
        // Port 9 (discard) is closed on test hosts
        base_url: "http://127.0.0.1:9".to_string(),
        ..ServiceConfig::default()
    };
    let service = HttpPredictionService::new(&config).expect("client build");

    let request = ChatRequest {
        message: "itchy".to_string(),
        history: Vec::new(),
    };
    let err = service.chat(&request).await.unwrap_err();
    assert!(matches!(err, ServiceError::Connect { .. }));
    assert!(!service.check_connection().await);
}
