mod ingredient;
mod preferences;
mod recipe;

pub use ingredient::{Classification, IngredientRef};
pub use preferences::PreferenceVector;
pub use recipe::{GeneratedRecipes, MatchFilters, Nutrition, Recipe, ScoredRecipe, Substitution};
