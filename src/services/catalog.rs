use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::Recipe,
};

const BUILTIN_CATALOG: &str = include_str!("../../data/recipes.json");
const BUILTIN_SUBSTITUTIONS: &str = include_str!("../../data/substitutions.json");

/// Loads the recipe catalog used for local matching
///
/// Reads `path` when given, otherwise the catalog bundled with the binary.
pub fn load_catalog(path: Option<&str>) -> AppResult<Vec<Recipe>> {
    let raw = read_source(path, BUILTIN_CATALOG)?;
    let recipes: Vec<Recipe> = serde_json::from_str(&raw)?;
    tracing::info!(recipes = recipes.len(), source = path.unwrap_or("builtin"), "Catalog loaded");
    Ok(recipes)
}

fn read_source(path: Option<&str>, builtin: &str) -> AppResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| AppError::Internal(format!("Failed to read {}: {}", path, e))),
        None => Ok(builtin.to_string()),
    }
}

/// Static map from an ingredient to the ingredients that can replace it
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable(HashMap<String, Vec<String>>);

impl SubstitutionTable {
    /// Loads the table from `path`, or the bundled one
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let raw = read_source(path, BUILTIN_SUBSTITUTIONS)?;
        let entries: HashMap<String, Vec<String>> = serde_json::from_str(&raw)?;
        Ok(Self::from_entries(entries))
    }

    /// Builds a table, lower-casing keys so lookups match normalized names
    pub fn from_entries(entries: HashMap<String, Vec<String>>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v))
                .collect(),
        )
    }

    pub fn entries(&self) -> &HashMap<String, Vec<String>> {
        &self.0
    }
}
