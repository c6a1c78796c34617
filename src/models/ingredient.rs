use serde::{Deserialize, Deserializer, Serialize};

/// A recipe ingredient as it appears in recipe data
///
/// Catalog and generated recipes mix bare names (`"basil"`) with measured
/// entries (`{"name": "flour", "qty": 2, "unit": "cup"}`). Both compare by
/// their lower-cased name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientRef {
    Detailed {
        name: String,
        #[serde(
            default,
            deserialize_with = "deserialize_qty",
            skip_serializing_if = "Option::is_none"
        )]
        qty: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Name(String),
}

impl IngredientRef {
    /// Raw ingredient name, as written
    pub fn name(&self) -> &str {
        match self {
            IngredientRef::Detailed { name, .. } => name,
            IngredientRef::Name(name) => name,
        }
    }

    /// Quantity used for nutrition math; absent or zero counts as one unit
    pub fn quantity(&self) -> f64 {
        match self {
            IngredientRef::Detailed { qty: Some(qty), .. } if *qty != 0.0 => *qty,
            _ => 1.0,
        }
    }
}

impl From<&str> for IngredientRef {
    fn from(name: &str) -> Self {
        IngredientRef::Name(name.to_string())
    }
}

/// LLM output sometimes quotes quantities ("2") or uses fractions ("1/2")
fn deserialize_qty<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => parse_quantity(&s),
        _ => None,
    })
}

fn parse_quantity(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    raw.parse().ok()
}

/// One label from the image classifier, in model order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    #[serde(alias = "score", alias = "probability")]
    pub confidence: f64,
}
