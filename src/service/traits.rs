use async_trait::async_trait;

use super::error::ServiceError;
use super::types::{ChatRequest, ImageUpload, ServiceReply};

/// The two prediction channels exposed by the remote service.
///
/// Each call is exactly one attempt. Implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Send a symptom description together with the prior transcript
    async fn chat(&self, request: &ChatRequest) -> Result<ServiceReply, ServiceError>;

    /// Upload one image for visual prediction
    async fn predict_image(&self, upload: &ImageUpload) -> Result<ServiceReply, ServiceError>;
}
