use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct IngredientQuery {
    /// Name prefix
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    params(IngredientQuery),
    responses(
        (status = 200, description = "Ingredients ordered by name")
    )
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<IngredientQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let ingredients = state.ingredient_repo.find_all(params.name).await?;
    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let ingredient = state
        .ingredient_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Ingredient {}", id)))?;
    Ok(Json(ingredient))
}
