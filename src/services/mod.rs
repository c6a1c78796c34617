pub mod catalog;
pub mod generation;
pub mod ingredients;
pub mod matcher;
pub mod nutrition;
pub mod preferences;
pub mod providers;

pub use catalog::{load_catalog, SubstitutionTable};
pub use generation::Debouncer;
pub use matcher::{match_recipes, normalize_ingredient_name, suggest_substitutions};
pub use providers::{ImageClassifier, RecipeGenerator};
