use serde::{Deserialize, Deserializer, Serialize};

use super::IngredientRef;

/// Declared nutrition per recipe yield
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub calories: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub protein: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub fat: f64,
}

/// A catalog or generated recipe
///
/// Every field but `id` and `name` defaults so that partially filled LLM
/// output is still accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientRef>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Total time in minutes
    #[serde(default, deserialize_with = "deserialize_count")]
    pub time: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub servings: Option<u32>,
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
}

/// Leading number of a loosely typed value: `22.5`, `"4"`, `"25 minutes"`
fn leading_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let s = s.trim();
            let end = s
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .unwrap_or(s.len());
            s[..end].parse().ok()
        }
        _ => None,
    }
}

/// Whole, non-negative count; floats round, anything unreadable is `None`
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(leading_number)
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32))
}

/// Nutrition amount; unreadable values count as zero
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(leading_number)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0))
}

/// Optional constraints applied while scoring recipes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilters {
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub max_time: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl MatchFilters {
    /// Diet filter, ignoring blank values
    pub fn diet(&self) -> Option<&str> {
        self.diet.as_deref().filter(|d| !d.is_empty())
    }

    /// Time budget, ignoring zero
    pub fn max_time(&self) -> Option<u32> {
        self.max_time.filter(|t| *t > 0)
    }

    /// Difficulty filter, ignoring blank values
    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref().filter(|d| !d.is_empty())
    }
}

/// A recipe annotated with its match score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub score: f64,
    pub overlap: usize,
    pub missing_count: usize,
}

/// A missing recipe ingredient with known stand-ins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub missing: String,
    pub substitutes: Vec<String>,
}

/// Envelope the generator is asked to produce
#[derive(Debug, Default, Deserialize)]
pub struct GeneratedRecipes {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}
