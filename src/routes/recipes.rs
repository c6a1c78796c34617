use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::GeneratedBatch,
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{IngredientRef, MatchFilters, Nutrition, Recipe, ScoredRecipe, Substitution},
    routes::AppState,
    services::{
        ingredients::{merge_ingredients, parse_manual_input},
        match_recipes,
        nutrition::{scale_ingredients, scale_nutrition, serving_ratio},
        suggest_substitutions,
    },
};

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub ingredients: Vec<String>,
    #[serde(flatten)]
    pub filters: MatchFilters,
    /// Candidates to score instead of the catalog
    #[serde(default)]
    pub recipes: Option<Vec<Recipe>>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub ingredients: Vec<String>,
    #[serde(flatten)]
    pub filters: MatchFilters,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub servings: Option<u32>,
    /// Comma-separated ingredients on hand, for substitutions
    pub available: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub servings: u32,
    /// Ingredients with quantities scaled to `servings`
    pub ingredients: Vec<IngredientRef>,
    /// Declared nutrition scaled to `servings`
    pub nutrition: Option<Nutrition>,
    pub substitutions: Vec<Substitution>,
    pub favorite: bool,
    pub rating: Option<u8>,
}

/// Ranks the catalog (or supplied recipes) against the given ingredients
pub async fn match_catalog(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MatchRequest>,
) -> Json<Vec<ScoredRecipe>> {
    let candidates = request.recipes.as_deref().unwrap_or(&state.catalog);
    Json(match_recipes(&request.ingredients, candidates, &request.filters))
}

/// Generates recipes with the configured provider and stores the result
///
/// Bursts of requests are debounced; a request overtaken by a newer one
/// during its quiet period fails with `Superseded`. Clearing the ingredient
/// list counts as a newer request.
#[tracing::instrument(skip_all, fields(request_id = %request_id))]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<GeneratedBatch>> {
    let ingredients = merge_ingredients(&[], &request.ingredients);
    if ingredients.is_empty() {
        state.debouncer.bump();
        return Ok(Json(GeneratedBatch::default()));
    }

    if !state.debouncer.settle().await {
        return Err(AppError::Superseded(
            "A newer generation request replaced this one".to_string(),
        ));
    }

    tracing::info!(
        ingredients = ingredients.len(),
        provider = state.generator.name(),
        "Generating recipes"
    );

    let recipes = state
        .generator
        .generate(&ingredients, &request.filters)
        .await?;
    let batch = state.storage.save_generated(&recipes).await;

    tracing::info!(
        recipes = batch.recipes.len(),
        "Generated recipes stored"
    );

    Ok(Json(batch))
}

/// Recipe detail view with serving scaling and substitutions
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<RecipeDetail>> {
    let recipe = match state.storage.find_generated(&id).await {
        Some(recipe) => recipe,
        None => state
            .catalog
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Recipe {}", id)))?,
    };

    let servings = query
        .servings
        .filter(|s| *s > 0)
        .or(recipe.servings)
        .unwrap_or(1);
    let ratio = serving_ratio(&recipe, servings);

    let available = query
        .available
        .as_deref()
        .map(parse_manual_input)
        .unwrap_or_default();

    let favorite = state.storage.get_favorites().await.contains(&recipe.id);
    let rating = state.storage.get_ratings().await.get(&recipe.id).copied();

    Ok(Json(RecipeDetail {
        servings,
        ingredients: scale_ingredients(&recipe.ingredients, ratio),
        nutrition: recipe.nutrition.map(|n| scale_nutrition(&n, ratio)),
        substitutions: suggest_substitutions(
            &available,
            &recipe,
            state.substitutions.entries(),
        ),
        favorite,
        rating,
        recipe,
    }))
}
