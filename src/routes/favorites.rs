use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{models::Recipe, routes::AppState};

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub ids: BTreeSet<String>,
    /// Favorites that resolve to a known recipe
    pub recipes: Vec<Recipe>,
}

async fn resolve(state: &AppState, ids: BTreeSet<String>) -> FavoritesResponse {
    let recipes = state
        .known_recipes()
        .await
        .into_iter()
        .filter(|r| ids.contains(&r.id))
        .collect();
    FavoritesResponse { ids, recipes }
}

/// Lists favorite recipe ids
pub async fn list(State(state): State<Arc<AppState>>) -> Json<FavoritesResponse> {
    let ids = state.storage.get_favorites().await;
    Json(resolve(&state, ids).await)
}

/// Flips the favorite flag of one recipe
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<FavoritesResponse> {
    let ids = state.storage.toggle_favorite(&id).await;
    tracing::info!(recipe_id = %id, favorite = ids.contains(&id), "Favorite toggled");
    Json(resolve(&state, ids).await)
}
