use thiserror::Error;

/// Failure to complete a request against the prediction service.
///
/// Every variant is a transport failure from the session's point of view:
/// the detail is logged, the transcript only ever sees the fixed
/// connectivity message.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to reach {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode reply from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build request: {0}")]
    Request(String),
}
