use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::KeyValueStore;
use crate::models::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Favorites,
    Ratings,
    GeneratedRecipes,
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::Favorites => write!(f, "srg_favorites"),
            StorageKey::Ratings => write!(f, "srg_ratings"),
            StorageKey::GeneratedRecipes => write!(f, "srg_generated_recipes"),
        }
    }
}

/// The most recent generation result
///
/// Written as `{generatedAt, recipes}`; a bare recipe array is still read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredBatch")]
pub struct GeneratedBatch {
    pub generated_at: Option<DateTime<Utc>>,
    pub recipes: Vec<Recipe>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBatch {
    Stamped {
        #[serde(rename = "generatedAt", default)]
        generated_at: Option<DateTime<Utc>>,
        recipes: Vec<Recipe>,
    },
    Bare(Vec<Recipe>),
}

impl From<StoredBatch> for GeneratedBatch {
    fn from(stored: StoredBatch) -> Self {
        match stored {
            StoredBatch::Stamped {
                generated_at,
                recipes,
            } => Self {
                generated_at,
                recipes,
            },
            StoredBatch::Bare(recipes) => Self {
                generated_at: None,
                recipes,
            },
        }
    }
}

/// Favorites, ratings and the last generated recipes, stored as JSON blobs
///
/// Reads never fail: missing, corrupt or unreachable data comes back as the
/// empty default. Writes that fail are logged and dropped. Each operation is
/// an independent read-modify-write; there is no cross-key atomicity.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    fn key(&self, key: StorageKey) -> String {
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.namespace, key)
        }
    }

    async fn read<T: DeserializeOwned + Default>(&self, key: StorageKey) -> T {
        let key = self.key(key);
        match self.store.get(&key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(key = %key, error = %e, "Discarding corrupt stored value");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key = %key, backend = self.store.name(), error = %e, "Storage read failed");
                T::default()
            }
        }
    }

    async fn write<T: Serialize>(&self, key: StorageKey, value: &T) {
        let key = self.key(key);
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Storage serialization error");
                return;
            }
        };

        if let Err(e) = self.store.set(&key, json).await {
            tracing::warn!(key = %key, backend = self.store.name(), error = %e, "Storage write failed");
        }
    }

    pub async fn get_favorites(&self) -> BTreeSet<String> {
        self.read(StorageKey::Favorites).await
    }

    /// Adds `recipe_id` to favorites, or removes it if already present
    pub async fn toggle_favorite(&self, recipe_id: &str) -> BTreeSet<String> {
        let mut favorites = self.get_favorites().await;
        if !favorites.remove(recipe_id) {
            favorites.insert(recipe_id.to_string());
        }
        self.write(StorageKey::Favorites, &favorites).await;
        favorites
    }

    pub async fn get_ratings(&self) -> BTreeMap<String, u8> {
        self.read(StorageKey::Ratings).await
    }

    pub async fn set_rating(&self, recipe_id: &str, rating: u8) {
        let mut ratings = self.get_ratings().await;
        ratings.insert(recipe_id.to_string(), rating);
        self.write(StorageKey::Ratings, &ratings).await;
    }

    /// Replaces the stored generation result
    pub async fn save_generated(&self, recipes: &[Recipe]) -> GeneratedBatch {
        let batch = GeneratedBatch {
            generated_at: Some(Utc::now()),
            recipes: recipes.to_vec(),
        };
        self.write(StorageKey::GeneratedRecipes, &batch).await;
        batch
    }

    pub async fn generated_recipes(&self) -> Vec<Recipe> {
        self.read::<GeneratedBatch>(StorageKey::GeneratedRecipes)
            .await
            .recipes
    }

    pub async fn find_generated(&self, recipe_id: &str) -> Option<Recipe> {
        self.generated_recipes()
            .await
            .into_iter()
            .find(|r| r.id == recipe_id)
    }
}
