use std::collections::HashSet;

use crate::models::Classification;

/// Splits comma-separated manual input into trimmed, non-empty entries
pub fn parse_manual_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Adds lower-cased `additions` to `current`, keeping first-insertion order
/// and dropping duplicates and blanks
pub fn merge_ingredients<S: AsRef<str>>(current: &[String], additions: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(current.len() + additions.len());

    let incoming = additions
        .iter()
        .map(|s| s.as_ref().to_lowercase())
        .filter(|s| !s.is_empty());

    for name in current.iter().cloned().chain(incoming) {
        if seen.insert(name.clone()) {
            merged.push(name);
        }
    }

    merged
}

/// Drops an ingredient from the list by exact name
pub fn remove_ingredient(current: &[String], name: &str) -> Vec<String> {
    current.iter().filter(|i| *i != name).cloned().collect()
}

/// Takes the first `top_n` classifier labels as ingredient candidates
pub fn candidates_from_predictions(predictions: &[Classification], top_n: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    predictions
        .iter()
        .take(top_n)
        .map(|p| p.label.trim().to_string())
        .filter(|label| !label.is_empty() && seen.insert(label.clone()))
        .collect()
}
