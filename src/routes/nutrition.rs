use axum::Json;
use serde::Deserialize;

use crate::{
    models::{IngredientRef, Nutrition},
    services::nutrition::estimate_nutrition,
};

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub ingredients: Vec<IngredientRef>,
}

pub async fn estimate(Json(request): Json<EstimateRequest>) -> Json<Nutrition> {
    Json(estimate_nutrition(&request.ingredients))
}
