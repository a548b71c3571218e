// Gateway module for the prediction service - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod error;
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access service functionality
pub use error::ServiceError;
pub use http::HttpPredictionService;
#[cfg(test)]
pub use traits::MockPredictionService;
pub use traits::PredictionService;
pub use types::{ChatRequest, ImageUpload, Prediction, ServiceReply};
