use std::collections::{HashMap, HashSet};

use crate::models::{IngredientRef, MatchFilters, Recipe, ScoredRecipe, Substitution};

const DIET_MISMATCH_PENALTY: f64 = -0.3;
const OVER_TIME_PENALTY: f64 = -0.2;
const DIFFICULTY_MISMATCH_PENALTY: f64 = -0.1;

/// Canonical comparison key for an ingredient
pub fn normalize_ingredient_name(ingredient: &IngredientRef) -> String {
    ingredient.name().to_lowercase()
}

fn available_set<S: AsRef<str>>(available: &[S]) -> HashSet<String> {
    available
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect()
}

/// Scores recipes against the ingredients on hand
///
/// The base score is the share of a recipe's ingredients that are available.
/// Fixed penalties for diet, time and difficulty mismatches are added on top.
/// Recipes scoring zero or less are dropped. The rest come back best first,
/// with ties kept in input order.
pub fn match_recipes<S: AsRef<str>>(
    available: &[S],
    recipes: &[Recipe],
    filters: &MatchFilters,
) -> Vec<ScoredRecipe> {
    let available = available_set(available);

    let mut scored: Vec<ScoredRecipe> = recipes
        .iter()
        .map(|recipe| score_recipe(&available, recipe, filters))
        .filter(|r| r.score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(
        candidates = recipes.len(),
        matched = scored.len(),
        "Recipes scored"
    );

    scored
}

fn score_recipe(
    available: &HashSet<String>,
    recipe: &Recipe,
    filters: &MatchFilters,
) -> ScoredRecipe {
    let ingredients: Vec<String> = recipe
        .ingredients
        .iter()
        .map(normalize_ingredient_name)
        .collect();

    let overlap = ingredients
        .iter()
        .filter(|name| available.contains(*name))
        .count();

    let base_score = if ingredients.is_empty() {
        0.0
    } else {
        overlap as f64 / ingredients.len() as f64
    };

    let diet_penalty = match filters.diet() {
        Some(diet) if !recipe.diet.iter().any(|d| d == diet) => DIET_MISMATCH_PENALTY,
        _ => 0.0,
    };

    let time_penalty = match (filters.max_time(), recipe.time) {
        (Some(max_time), Some(time)) if time > max_time => OVER_TIME_PENALTY,
        _ => 0.0,
    };

    let difficulty_penalty = match filters.difficulty() {
        Some(difficulty) if recipe.difficulty != difficulty => DIFFICULTY_MISMATCH_PENALTY,
        _ => 0.0,
    };

    ScoredRecipe {
        recipe: recipe.clone(),
        score: base_score + diet_penalty + time_penalty + difficulty_penalty,
        overlap,
        missing_count: ingredients.len().saturating_sub(overlap),
    }
}

/// Lists stand-ins for every recipe ingredient that is not on hand
///
/// Only ingredients with a non-empty entry in the table are reported, in
/// recipe order. Lookup is by exact lower-cased name.
pub fn suggest_substitutions<S: AsRef<str>>(
    available: &[S],
    recipe: &Recipe,
    table: &HashMap<String, Vec<String>>,
) -> Vec<Substitution> {
    let available = available_set(available);

    recipe
        .ingredients
        .iter()
        .map(normalize_ingredient_name)
        .filter(|missing| !available.contains(missing))
        .filter_map(|missing| {
            table
                .get(&missing)
                .filter(|subs| !subs.is_empty())
                .map(|subs| Substitution {
                    missing,
                    substitutes: subs.clone(),
                })
        })
        .collect()
}
