use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    models::PreferenceVector, routes::AppState, services::preferences::preference_vector,
};

/// Taste profile over every known recipe the user has rated
pub async fn get(State(state): State<Arc<AppState>>) -> Json<PreferenceVector> {
    let recipes = state.known_recipes().await;
    let ratings = state.storage.get_ratings().await;
    Json(preference_vector(&recipes, &ratings))
}
