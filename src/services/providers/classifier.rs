//! Image classification through a hosted inference endpoint
//!
//! The endpoint receives the raw image bytes and answers with
//! `[{"label": ..., "score": ...}]`, the Hugging Face inference format.

use reqwest::{header::CONTENT_TYPE, Client as HttpClient};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Classification,
    services::providers::{ImageClassifier, IMAGE_ANALYSIS_FAILED_MESSAGE},
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Labels(Vec<Classification>),
    Error { error: String },
}

#[derive(Clone)]
pub struct HttpImageClassifier {
    http_client: HttpClient,
    api_url: String,
    api_token: Option<String>,
}

impl HttpImageClassifier {
    pub fn new(api_url: String, api_token: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_token,
        }
    }

    async fn request_labels(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> AppResult<Vec<Classification>> {
        let mut request = self
            .http_client
            .post(&self.api_url)
            .header(CONTENT_TYPE, content_type)
            .body(image);

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ImageAnalysis(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let payload: InferenceResponse = response.json().await?;
        labels_from_response(payload)
    }
}

fn labels_from_response(payload: InferenceResponse) -> AppResult<Vec<Classification>> {
    match payload {
        InferenceResponse::Labels(labels) => Ok(labels),
        InferenceResponse::Error { error } => Err(AppError::ImageAnalysis(error)),
    }
}

#[async_trait::async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> AppResult<Vec<Classification>> {
        let size = image.len();
        match self.request_labels(image, content_type).await {
            Ok(labels) => {
                tracing::info!(
                    bytes = size,
                    labels = labels.len(),
                    provider = self.name(),
                    "Image classified"
                );
                Ok(labels)
            }
            Err(e) => {
                tracing::error!(error = %e, provider = self.name(), "Image analysis failed");
                Err(AppError::ImageAnalysis(
                    IMAGE_ANALYSIS_FAILED_MESSAGE.to_string(),
                ))
            }
        }
    }

    fn name(&self) -> &'static str {
        "http_inference"
    }
}
