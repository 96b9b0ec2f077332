use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::Claims;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::{RecipeList, recipe_list_service};

pub async fn add_favorite(
    State(state): State<AppState>,
    claims: Claims,
    Path(recipe_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let card = recipe_list_service::add_recipe(
        state.db(),
        RecipeList::Favorites,
        claims.user_id,
        recipe_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    claims: Claims,
    Path(recipe_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    recipe_list_service::remove_recipe(
        state.db(),
        RecipeList::Favorites,
        claims.user_id,
        recipe_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
