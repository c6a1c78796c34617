use std::collections::BTreeMap;

use crate::models::{PreferenceVector, Recipe};

/// Ordinal weight of a difficulty label; unknown labels count as medium
pub fn difficulty_score(difficulty: &str) -> f64 {
    match difficulty {
        "easy" => 1.0,
        "medium" => 2.0,
        "hard" => 3.0,
        _ => 2.0,
    }
}

/// Folds ratings over `recipes` into a preference vector
///
/// Unrated recipes (missing or zero rating) are ignored. Cuisine and diet
/// tallies are rating-weighted sums.
pub fn preference_vector(recipes: &[Recipe], ratings: &BTreeMap<String, u8>) -> PreferenceVector {
    let mut pref = PreferenceVector::default();
    let mut difficulty_total = 0.0;

    for recipe in recipes {
        let rating = match ratings.get(&recipe.id) {
            Some(rating) if *rating > 0 => u32::from(*rating),
            _ => continue,
        };

        pref.count += 1;
        difficulty_total += difficulty_score(&recipe.difficulty);

        if !recipe.cuisine.is_empty() {
            *pref.cuisines.entry(recipe.cuisine.clone()).or_insert(0) += rating;
        }
        for diet in &recipe.diet {
            *pref.diet.entry(diet.clone()).or_insert(0) += rating;
        }
    }

    if pref.count > 0 {
        pref.avg_difficulty = difficulty_total / pref.count as f64;
    }

    pref
}
