use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Taste profile derived from a user's ratings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceVector {
    /// Rating sum per cuisine
    pub cuisines: BTreeMap<String, u32>,
    /// Rating sum per diet tag
    pub diet: BTreeMap<String, u32>,
    /// Mean of easy=1, medium=2, hard=3 over rated recipes
    pub avg_difficulty: f64,
    /// Number of rated recipes considered
    pub count: usize,
}
