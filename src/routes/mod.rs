use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{Config, StorageBackend},
    db::{create_redis_client, KeyValueStore, MemoryStore, RedisStore, Storage},
    middleware::{make_span_with_request_id, request_id_middleware},
    models::Recipe,
    services::{
        load_catalog,
        providers::{GeminiRecipeGenerator, HttpImageClassifier},
        Debouncer, ImageClassifier, RecipeGenerator, SubstitutionTable,
    },
};

pub mod favorites;
pub mod ingredients;
pub mod nutrition;
pub mod preferences;
pub mod ratings;
pub mod recipes;

/// Shared application state
pub struct AppState {
    pub storage: Storage,
    pub generator: Arc<dyn RecipeGenerator>,
    pub classifier: Arc<dyn ImageClassifier>,
    pub catalog: Vec<Recipe>,
    pub substitutions: SubstitutionTable,
    pub debouncer: Debouncer,
    pub classifier_top_n: usize,
    /// Upload limit for the classify route
    pub max_image_bytes: usize,
}

impl AppState {
    /// Wires storage, providers and static data from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match config.storage_backend {
            StorageBackend::Redis => {
                Arc::new(RedisStore::new(create_redis_client(&config.redis_url)?))
            }
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };

        if config.gemini_api_key.is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set; recipe generation will fail");
        }

        Ok(Self {
            storage: Storage::new(store, config.storage_namespace.clone()),
            generator: Arc::new(GeminiRecipeGenerator::new(
                config.gemini_api_key.clone(),
                config.gemini_api_url.clone(),
                config.gemini_model.clone(),
            )),
            classifier: Arc::new(HttpImageClassifier::new(
                config.classifier_url.clone(),
                config.classifier_token.clone(),
            )),
            catalog: load_catalog(config.catalog_path.as_deref())?,
            substitutions: SubstitutionTable::load(config.substitutions_path.as_deref())?,
            debouncer: Debouncer::new(Duration::from_millis(config.generation_debounce_ms)),
            classifier_top_n: config.classifier_top_n,
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Last generated recipes followed by catalog recipes with unseen ids
    pub async fn known_recipes(&self) -> Vec<Recipe> {
        let mut recipes = self.storage.generated_recipes().await;
        let extra: Vec<Recipe> = self
            .catalog
            .iter()
            .filter(|c| !recipes.iter().any(|r| r.id == c.id))
            .cloned()
            .collect();
        recipes.extend(extra);
        recipes
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state.max_image_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(max_image_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/ingredients/parse", post(ingredients::parse))
        .route(
            "/ingredients/classify",
            post(ingredients::classify).layer(DefaultBodyLimit::max(max_image_bytes)),
        )
        .route("/recipes/match", post(recipes::match_catalog))
        .route("/recipes/generate", post(recipes::generate))
        .route("/recipes/:id", get(recipes::detail))
        .route("/favorites", get(favorites::list))
        .route("/favorites/:id/toggle", post(favorites::toggle))
        .route("/ratings", get(ratings::list))
        .route("/ratings/:id", put(ratings::set))
        .route("/preferences", get(preferences::get))
        .route("/nutrition/estimate", post(nutrition::estimate))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
