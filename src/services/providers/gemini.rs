//! Recipe generation through the Gemini `generateContent` API

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{GeneratedRecipes, MatchFilters, Recipe},
    services::providers::{RecipeGenerator, GENERATION_FAILED_MESSAGE},
};

const RECIPE_SHAPE: &str = r#"{
  "recipes": [
    {
      "id": "unique-recipe-id",
      "name": "Recipe Name",
      "cuisine": "Cuisine Type",
      "image": "https://images.unsplash.com/photo-[placeholder]?auto=format&fit=crop&w=400&q=80",
      "ingredients": [
        {"name": "ingredient", "qty": 1, "unit": "cup"},
        {"name": "ingredient2", "qty": 2, "unit": "tbsp"}
      ],
      "steps": [
        "Step 1: Detailed instruction",
        "Step 2: Detailed instruction"
      ],
      "time": 30,
      "servings": 4,
      "diet": ["vegetarian", "gluten-free"],
      "difficulty": "easy",
      "nutrition": {
        "calories": 350,
        "protein": 15,
        "carbs": 45,
        "fat": 12
      }
    }
  ]
}"#;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Clone)]
pub struct GeminiRecipeGenerator {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiRecipeGenerator {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    async fn request_recipes(
        &self,
        ingredients: &[String],
        filters: &MatchFilters,
    ) -> AppResult<Vec<Recipe>> {
        if self.api_key.is_empty() {
            return Err(AppError::Internal("GEMINI_API_KEY is not set".to_string()));
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(ingredients, filters)),
                }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RecipeGeneration(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let payload: GenerateContentResponse = response.json().await?;
        if let Some(error) = payload.error {
            return Err(AppError::RecipeGeneration(error.message));
        }

        let text = response_text(&payload);
        parse_recipes(&text)
    }
}

#[async_trait::async_trait]
impl RecipeGenerator for GeminiRecipeGenerator {
    async fn generate(
        &self,
        ingredients: &[String],
        filters: &MatchFilters,
    ) -> AppResult<Vec<Recipe>> {
        match self.request_recipes(ingredients, filters).await {
            Ok(recipes) => {
                tracing::info!(
                    ingredients = ingredients.len(),
                    recipes = recipes.len(),
                    model = %self.model,
                    provider = self.name(),
                    "Recipes generated"
                );
                Ok(recipes)
            }
            Err(e) => {
                tracing::error!(error = %e, provider = self.name(), "Error generating recipes");
                Err(AppError::RecipeGeneration(
                    GENERATION_FAILED_MESSAGE.to_string(),
                ))
            }
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Builds the generation prompt; unset filters are left out
pub fn build_prompt(ingredients: &[String], filters: &MatchFilters) -> String {
    let mut requirements = Vec::new();
    if let Some(diet) = filters.diet() {
        requirements.push(format!("- Diet: {}", diet));
    }
    if let Some(max_time) = filters.max_time() {
        requirements.push(format!("- Max cooking time: {} minutes", max_time));
    }
    if let Some(difficulty) = filters.difficulty() {
        requirements.push(format!("- Difficulty: {}", difficulty));
    }

    format!(
        "Generate 3-5 detailed recipes using these ingredients: {}.\n\n\
         Requirements:\n{}\n\n\
         For each recipe, provide a JSON response with this exact structure:\n{}\n\n\
         Make recipes practical and delicious. Use realistic cooking times and serving sizes.",
        ingredients.join(", "),
        requirements.join("\n"),
        RECIPE_SHAPE
    )
}

fn response_text(payload: &GenerateContentResponse) -> String {
    payload
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Outermost `{ ... }` span of free-form model output
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses the recipe envelope out of model output
pub fn parse_recipes(text: &str) -> AppResult<Vec<Recipe>> {
    let json = extract_json_object(text).ok_or_else(|| {
        AppError::RecipeGeneration("No valid JSON found in response".to_string())
    })?;
    let envelope: GeneratedRecipes = serde_json::from_str(json)?;
    Ok(envelope.recipes)
}
