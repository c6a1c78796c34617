use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Classification,
    routes::AppState,
    services::{
        ingredients::{
            candidates_from_predictions, merge_ingredients, parse_manual_input, remove_ingredient,
        },
        providers::IMAGE_ANALYSIS_FAILED_MESSAGE,
    },
};

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    /// Comma-separated manual entry
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub current: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct IngredientsResponse {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub predictions: Vec<Classification>,
    pub candidates: Vec<String>,
}

/// Merges manual input into the current ingredient list
pub async fn parse(Json(request): Json<ParseRequest>) -> Json<IngredientsResponse> {
    let mut ingredients = merge_ingredients(&request.current, &parse_manual_input(&request.input));
    for name in &request.remove {
        ingredients = remove_ingredient(&ingredients, name);
    }
    Json(IngredientsResponse { ingredients })
}

/// Classifies an uploaded image and proposes its top labels as ingredients
///
/// An upload that cannot be read (including one over the configured size
/// limit) is reported with the same inline message as a failed analysis.
#[tracing::instrument(skip_all, fields(request_id = %request_id))]
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<ClassifyResponse>> {
    let body = body.map_err(|rejection| {
        tracing::warn!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Unreadable image upload"
        );
        AppError::ImageAnalysis(IMAGE_ANALYSIS_FAILED_MESSAGE.to_string())
    })?;

    if body.is_empty() {
        return Err(AppError::InvalidInput("Image body is empty".to_string()));
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    tracing::info!(
        bytes = body.len(),
        content_type = %content_type,
        provider = state.classifier.name(),
        "Classifying image"
    );

    let predictions = state.classifier.classify(body.to_vec(), content_type).await?;
    let candidates = candidates_from_predictions(&predictions, state.classifier_top_n);

    Ok(Json(ClassifyResponse {
        predictions,
        candidates,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{create_router, test_support};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn label(name: &str, confidence: f64) -> Classification {
        Classification {
            label: name.to_string(),
            confidence,
        }
    }

    #[tokio::test]
    async fn test_classify_returns_top_candidates() {
        let mut classifier = test_support::classifier();
        classifier
            .expect_classify()
            .withf(|image, content_type| {
                !image.is_empty() && content_type.eq_ignore_ascii_case("image/png")
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    label("banana", 0.7),
                    label("lemon", 0.1),
                    label("orange", 0.08),
                    label("banana", 0.05),
                    label("zucchini", 0.01),
                ])
            });
        let state = test_support::state_with(test_support::generator(), classifier);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .post("/api/v1/ingredients/classify")
            .content_type("image/png")
            .bytes(Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47]))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["candidates"], json!(["banana", "lemon", "orange"]));
        assert_eq!(body["predictions"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_classify_failure_is_reported_inline() {
        let mut classifier = test_support::classifier();
        classifier.expect_classify().returning(|_, _| {
            Err(AppError::ImageAnalysis(
                IMAGE_ANALYSIS_FAILED_MESSAGE.to_string(),
            ))
        });
        let state = test_support::state_with(test_support::generator(), classifier);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .post("/api/v1/ingredients/classify")
            .content_type("image/jpeg")
            .bytes(Bytes::from_static(&[0xFF, 0xD8]))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], IMAGE_ANALYSIS_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_classify_rejects_empty_body() {
        let mut classifier = test_support::classifier();
        classifier.expect_classify().times(0);
        let state = test_support::state_with(test_support::generator(), classifier);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .post("/api/v1/ingredients/classify")
            .content_type("image/jpeg")
            .bytes(Bytes::new())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_classify_accepts_photo_larger_than_two_mib() {
        let mut classifier = test_support::classifier();
        classifier
            .expect_classify()
            .withf(|image, _| image.len() == 3 * 1024 * 1024)
            .times(1)
            .returning(|_, _| Ok(vec![label("apple", 0.9)]));
        let state = test_support::state_with(test_support::generator(), classifier);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .post("/api/v1/ingredients/classify")
            .content_type("image/jpeg")
            .bytes(Bytes::from(vec![0xAB; 3 * 1024 * 1024]))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["candidates"], json!(["apple"]));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_reported_inline() {
        let mut classifier = test_support::classifier();
        classifier.expect_classify().times(0);
        let state = test_support::state_with_image_limit(test_support::generator(), classifier, 16);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .post("/api/v1/ingredients/classify")
            .content_type("image/jpeg")
            .bytes(Bytes::from(vec![0xAB; 64]))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], IMAGE_ANALYSIS_FAILED_MESSAGE);
    }
}
