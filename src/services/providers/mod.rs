//! External collaborators behind async traits
//!
//! Recipe text generation and image classification are delegated to hosted
//! models. Handlers only see these traits so the backends can be swapped or
//! stubbed in tests.

use crate::{
    error::AppResult,
    models::{Classification, MatchFilters, Recipe},
};

pub mod classifier;
pub mod gemini;

pub use classifier::HttpImageClassifier;
pub use gemini::GeminiRecipeGenerator;

/// User-facing message for any generation failure
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate recipes. Please try again.";

/// User-facing message for any image analysis failure
pub const IMAGE_ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze image. Try another image or add manually.";

/// Produces recipes for a set of ingredients
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Generates recipes using `ingredients` under `filters`
    ///
    /// Failures surface as a single `AppError::RecipeGeneration`; there is no
    /// partial result.
    async fn generate(&self, ingredients: &[String], filters: &MatchFilters)
        -> AppResult<Vec<Recipe>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Labels the contents of an image
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Returns labels ordered from most to least likely
    async fn classify(&self, image: Vec<u8>, content_type: &str)
        -> AppResult<Vec<Classification>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
