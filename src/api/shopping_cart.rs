use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use crate::auth::Claims;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::shopping_list_service::{
    SHOPPING_LIST_FILENAME, render_shopping_list, shopping_list,
};
use crate::services::{RecipeList, recipe_list_service};

pub async fn add_to_cart(
    State(state): State<AppState>,
    claims: Claims,
    Path(recipe_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let card = recipe_list_service::add_recipe(
        state.db(),
        RecipeList::ShoppingCart,
        claims.user_id,
        recipe_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    claims: Claims,
    Path(recipe_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    recipe_list_service::remove_recipe(
        state.db(),
        RecipeList::ShoppingCart,
        claims.user_id,
        recipe_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Plain-text shopping list attachment", content_type = "text/plain"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, DomainError> {
    let items = shopping_list(state.db(), claims.user_id).await?;
    let body = render_shopping_list(&items);

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename={}",
        SHOPPING_LIST_FILENAME
    ))
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
