use crate::models::{IngredientRef, Nutrition, Recipe};

use super::matcher::normalize_ingredient_name;

/// Rough per-unit nutrition for common pantry ingredients
const NUTRITION_TABLE: &[(&str, Nutrition)] = &[
    ("egg", per_unit(78.0, 6.0, 0.6, 5.0)),
    ("tomato", per_unit(22.0, 1.0, 5.0, 0.2)),
    ("banana", per_unit(105.0, 1.3, 27.0, 0.3)),
    ("olive oil", per_unit(119.0, 0.0, 0.0, 13.5)),
    ("mozzarella", per_unit(85.0, 6.3, 0.7, 6.3)),
    ("basil", per_unit(1.0, 0.2, 0.1, 0.0)),
    ("flour", per_unit(455.0, 13.0, 95.0, 1.2)),
    ("milk", per_unit(103.0, 8.0, 12.0, 2.4)),
    ("onion", per_unit(44.0, 1.2, 10.0, 0.1)),
    ("salt", per_unit(0.0, 0.0, 0.0, 0.0)),
];

const fn per_unit(calories: f64, protein: f64, carbs: f64, fat: f64) -> Nutrition {
    Nutrition {
        calories,
        protein,
        carbs,
        fat,
    }
}

fn lookup(name: &str) -> Option<&'static Nutrition> {
    NUTRITION_TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, nutrition)| nutrition)
}

/// Estimates total nutrition of an ingredient list
///
/// Each known ingredient contributes its per-unit values times its quantity.
/// Unknown ingredients are skipped. Totals are rounded to whole numbers.
pub fn estimate_nutrition(ingredients: &[IngredientRef]) -> Nutrition {
    let total = ingredients
        .iter()
        .filter_map(|ing| {
            lookup(&normalize_ingredient_name(ing)).map(|base| (base, ing.quantity()))
        })
        .fold(Nutrition::default(), |acc, (base, qty)| Nutrition {
            calories: acc.calories + base.calories * qty,
            protein: acc.protein + base.protein * qty,
            carbs: acc.carbs + base.carbs * qty,
            fat: acc.fat + base.fat * qty,
        });

    scale_nutrition(&total, 1.0)
}

/// Ratio between the requested servings and the recipe's own yield
pub fn serving_ratio(recipe: &Recipe, servings: u32) -> f64 {
    match recipe.servings {
        Some(base) if base > 0 && servings > 0 => f64::from(servings) / f64::from(base),
        _ => 1.0,
    }
}

/// Multiplies every nutrition field by `ratio`, rounding to whole numbers
pub fn scale_nutrition(nutrition: &Nutrition, ratio: f64) -> Nutrition {
    Nutrition {
        calories: (nutrition.calories * ratio).round(),
        protein: (nutrition.protein * ratio).round(),
        carbs: (nutrition.carbs * ratio).round(),
        fat: (nutrition.fat * ratio).round(),
    }
}

/// Scales measured quantities by `ratio`, rounded to two decimals
pub fn scale_ingredients(ingredients: &[IngredientRef], ratio: f64) -> Vec<IngredientRef> {
    ingredients
        .iter()
        .map(|ing| match ing {
            IngredientRef::Detailed { name, qty, unit } => IngredientRef::Detailed {
                name: name.clone(),
                qty: qty.map(|q| (q * ratio * 100.0).round() / 100.0),
                unit: unit.clone(),
            },
            IngredientRef::Name(_) => ing.clone(),
        })
        .collect()
}
