use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use smart_recipe_api::{
    db::{MemoryStore, Storage},
    error::{AppError, AppResult},
    models::{Classification, MatchFilters, Recipe},
    routes::{create_router, AppState},
    services::{load_catalog, Debouncer, ImageClassifier, RecipeGenerator, SubstitutionTable},
};

/// Returns a fixed recipe list
struct StubGenerator {
    recipes: Vec<Recipe>,
}

#[async_trait::async_trait]
impl RecipeGenerator for StubGenerator {
    async fn generate(
        &self,
        _ingredients: &[String],
        _filters: &MatchFilters,
    ) -> AppResult<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct OfflineClassifier;

#[async_trait::async_trait]
impl ImageClassifier for OfflineClassifier {
    async fn classify(
        &self,
        _image: Vec<u8>,
        _content_type: &str,
    ) -> AppResult<Vec<Classification>> {
        Err(AppError::ImageAnalysis("offline".to_string()))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

fn generated_recipes() -> Vec<Recipe> {
    serde_json::from_value(json!([
        {
            "id": "gen-shakshuka",
            "name": "Shakshuka",
            "cuisine": "Middle Eastern",
            "ingredients": [
                {"name": "egg", "qty": 4, "unit": "pcs"},
                {"name": "tomato", "qty": 3, "unit": "pcs"},
                {"name": "onion", "qty": 1, "unit": "pcs"}
            ],
            "steps": ["Soften onion", "Simmer tomatoes", "Poach eggs"],
            "time": 30,
            "servings": 2,
            "diet": ["vegetarian", "gluten-free"],
            "difficulty": "easy",
            "nutrition": {"calories": 320, "protein": 18, "carbs": 14, "fat": 20}
        },
        {
            "id": "gen-gratin",
            "name": "Potato Gratin",
            "cuisine": "French",
            "ingredients": ["potato", "milk", "gruyere"],
            "time": 70,
            "servings": 4,
            "diet": ["vegetarian"],
            "difficulty": "medium"
        }
    ]))
    .unwrap()
}

fn create_test_server() -> TestServer {
    let state = AppState {
        storage: Storage::new(Arc::new(MemoryStore::new()), "test"),
        generator: Arc::new(StubGenerator {
            recipes: generated_recipes(),
        }),
        classifier: Arc::new(OfflineClassifier),
        catalog: load_catalog(None).unwrap(),
        substitutions: SubstitutionTable::load(None).unwrap(),
        debouncer: Debouncer::new(Duration::ZERO),
        classifier_top_n: 4,
        max_image_bytes: 16 * 1024 * 1024,
    };
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f1c1c9e-8a57-4c8e-9a4e-0d2b7c3f5a11";

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_parse_manual_ingredients() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/ingredients/parse")
        .json(&json!({
            "input": "Basil, egg ,, tomato",
            "current": ["tomato"],
            "remove": ["egg"]
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ingredients"], json!(["tomato", "basil"]));
}

#[tokio::test]
async fn test_match_catalog_ranks_best_first() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({
            "ingredients": ["tomato", "mozzarella", "basil", "olive oil", "salt", "egg"]
        }))
        .await;

    response.assert_status_ok();
    let results: Vec<serde_json::Value> = response.json();
    assert!(!results.is_empty());
    assert_eq!(results[0]["id"], "caprese-salad");
    assert_eq!(results[0]["score"], 1.0);
    assert_eq!(results[0]["missingCount"], 0);

    let scores: Vec<f64> = results.iter().map(|r| r["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| *s > 0.0));
}

#[tokio::test]
async fn test_match_supplied_recipes_with_diet_filter() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({
            "ingredients": ["tomato", "egg"],
            "diet": "vegan",
            "recipes": [
                {"id": "r1", "name": "Tomato Egg", "ingredients": ["tomato", "egg", "basil"], "diet": ["vegetarian"]}
            ]
        }))
        .await;

    response.assert_status_ok();
    let results: Vec<serde_json::Value> = response.json();
    assert_eq!(results.len(), 1);
    let score = results[0]["score"].as_f64().unwrap();
    assert!((score - 0.367).abs() < 1e-3);
    assert_eq!(results[0]["overlap"], 2);
}

#[tokio::test]
async fn test_generate_then_view_detail_with_substitutions() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recipes/generate")
        .json(&json!({"ingredients": ["egg", "tomato"], "maxTime": 45}))
        .await;
    response.assert_status_ok();
    let batch: serde_json::Value = response.json();
    assert_eq!(batch["recipes"].as_array().unwrap().len(), 2);

    let response = server
        .get("/api/v1/recipes/gen-shakshuka")
        .add_query_param("servings", 1)
        .add_query_param("available", "egg, tomato")
        .await;
    response.assert_status_ok();
    let detail: serde_json::Value = response.json();

    assert_eq!(detail["servings"], 1);
    assert_eq!(detail["ingredients"][0]["qty"], 2.0);
    assert_eq!(detail["nutrition"]["calories"], 160.0);
    assert_eq!(detail["substitutions"][0]["missing"], "onion");
    assert!(detail["substitutions"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["missing"] != "egg" && s["missing"] != "tomato"));
}

#[tokio::test]
async fn test_detail_falls_back_to_catalog_and_404s_unknown() {
    let server = create_test_server();

    let response = server.get("/api/v1/recipes/banana-pancakes").await;
    response.assert_status_ok();
    let detail: serde_json::Value = response.json();
    assert_eq!(detail["servings"], 4);

    let response = server.get("/api/v1/recipes/does-not-exist").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_toggle_is_reversible() {
    let server = create_test_server();

    let response = server.post("/api/v1/favorites/caprese-salad/toggle").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ids"], json!(["caprese-salad"]));
    assert_eq!(body["recipes"][0]["name"], "Caprese Salad");

    let response = server.post("/api/v1/favorites/caprese-salad/toggle").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["ids"], json!([]));

    let response = server.get("/api/v1/favorites").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["ids"], json!([]));
}

#[tokio::test]
async fn test_ratings_validate_range() {
    let server = create_test_server();

    let response = server
        .put("/api/v1/ratings/caprese-salad")
        .json(&json!({"rating": 6}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .put("/api/v1/ratings/caprese-salad")
        .json(&json!({"rating": 4}))
        .await;
    response.assert_status_ok();

    let response = server.get("/api/v1/ratings").await;
    let ratings: serde_json::Value = response.json();
    assert_eq!(ratings["caprese-salad"], 4);
}

#[tokio::test]
async fn test_preferences_follow_ratings() {
    let server = create_test_server();

    server
        .post("/api/v1/recipes/generate")
        .json(&json!({"ingredients": ["egg"]}))
        .await
        .assert_status_ok();
    server
        .put("/api/v1/ratings/gen-shakshuka")
        .json(&json!({"rating": 5}))
        .await
        .assert_status_ok();
    server
        .put("/api/v1/ratings/margherita-pizza")
        .json(&json!({"rating": 2}))
        .await
        .assert_status_ok();

    let response = server.get("/api/v1/preferences").await;
    response.assert_status_ok();
    let pref: serde_json::Value = response.json();

    assert_eq!(pref["count"], 2);
    assert_eq!(pref["cuisines"]["Middle Eastern"], 5);
    assert_eq!(pref["cuisines"]["Italian"], 2);
    assert_eq!(pref["diet"]["vegetarian"], 7);
    assert_eq!(pref["avgDifficulty"], 2.0);
}

#[tokio::test]
async fn test_nutrition_estimate() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/nutrition/estimate")
        .json(&json!({"ingredients": [{"name": "Egg", "qty": 2}, "banana", "dragonfruit"]}))
        .await;

    response.assert_status_ok();
    let nutrition: serde_json::Value = response.json();
    assert_eq!(nutrition["calories"], 261.0);
    assert_eq!(nutrition["protein"], 13.0);
}

#[tokio::test]
async fn test_classifier_failure_surfaces_as_bad_gateway() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/ingredients/classify")
        .content_type("image/jpeg")
        .bytes(axum::body::Bytes::from_static(&[0xFF, 0xD8, 0xFF]))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}
