use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::error::ServiceError;
use super::traits::PredictionService;
use super::types::{ChatRequest, ChatResponseBody, ImageResponseBody, ImageUpload, ServiceReply};
use crate::app::ServiceConfig;
use crate::constants::STATUS_CHECK_TIMEOUT_SECS;

/// Prediction service reached over HTTP
pub struct HttpPredictionService {
    client: Client,
    base_url: String,
    chat_url: String,
    image_url: String,
    image_field: String,
}

impl HttpPredictionService {
    /// Create a client for the configured endpoints.
    ///
    /// No timeout is applied unless `request_timeout_secs` is set.
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            chat_url: join_url(&config.base_url, &config.chat_path),
            image_url: join_url(&config.base_url, &config.image_path),
            image_field: config.image_field.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether anything answers at the base URL.
    ///
    /// Any HTTP status counts as reachable; only connection failures don't.
    pub async fn check_connection(&self) -> bool {
        let probe = match Client::builder()
            .timeout(Duration::from_secs(STATUS_CHECK_TIMEOUT_SECS))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };

        probe.get(&self.base_url).send().await.is_ok()
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn chat(&self, request: &ChatRequest) -> Result<ServiceReply, ServiceError> {
        debug!(url = %self.chat_url, history = request.history.len(), "posting chat request");

        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|source| ServiceError::Connect {
                url: self.chat_url.clone(),
                source,
            })?;

        let body: ChatResponseBody = decode(&self.chat_url, response).await?;
        Ok(body.into())
    }

    async fn predict_image(&self, upload: &ImageUpload) -> Result<ServiceReply, ServiceError> {
        debug!(
            url = %self.image_url,
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "uploading image"
        );

        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime)
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        let form = Form::new().part(self.image_field.clone(), part);

        let response = self
            .client
            .post(&self.image_url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ServiceError::Connect {
                url: self.image_url.clone(),
                source,
            })?;

        let body: ImageResponseBody = decode(&self.image_url, response).await?;
        Ok(body.into())
    }
}

/// Reject non-2xx replies, then decode the JSON body
async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.json::<T>().await.map_err(|source| ServiceError::Decode {
        url: url.to_string(),
        source,
    })
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
