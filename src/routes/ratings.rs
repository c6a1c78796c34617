use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
};

const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, u8>> {
    Json(state.storage.get_ratings().await)
}

/// Sets a 1-5 star rating, replacing any previous one
pub async fn set(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<RatingRequest>,
) -> AppResult<Json<BTreeMap<String, u8>>> {
    if !(MIN_RATING..=MAX_RATING).contains(&request.rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    state.storage.set_rating(&id, request.rating).await;
    Ok(Json(state.storage.get_ratings().await))
}
