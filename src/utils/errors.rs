use thiserror::Error;

use crate::service::ServiceError;

/// Main error type for skinchat
#[derive(Error, Debug)]
pub enum SkinChatError {
    /// User-facing prompt; nothing was changed or sent
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("UI error: {0}")]
    UIError(String),
}
