use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::api::pagination::{PageParams, PageResponse};
use crate::auth::Claims;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::recipe_service::{
    self, CreateRecipeInput, RecipeFilter, UpdateRecipeInput,
};

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .parse()
        .map_err(|_| DomainError::validation(format!("{} must be a number", key)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, DomainError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(DomainError::validation(format!("{} must be 0 or 1", key))),
    }
}

/// `tags` may repeat, so the query is read pair by pair instead of through `Query`
pub fn parse_recipe_query(raw: Option<&str>) -> Result<(PageParams, RecipeFilter), DomainError> {
    let mut page = PageParams::default();
    let mut filter = RecipeFilter::default();

    let Some(raw) = raw else {
        return Ok((page, filter));
    };

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "page" => page.page = Some(parse_number("page", &value)?),
            "limit" => page.limit = Some(parse_number("limit", &value)?),
            "author" => filter.author = Some(parse_number("author", &value)?),
            "tags" => filter.tags.push(value.into_owned()),
            "is_favorited" => filter.is_favorited = parse_flag("is_favorited", &value)?,
            "is_in_shopping_cart" => {
                filter.is_in_shopping_cart = parse_flag("is_in_shopping_cart", &value)?
            }
            _ => {}
        }
    }

    Ok((page, filter))
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("author" = Option<i32>, Query, description = "Author id"),
        ("tags" = Option<String>, Query, description = "Tag slug, repeatable"),
        ("is_favorited" = Option<u8>, Query, description = "1 to keep only favorites"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "1 to keep only cart recipes")
    ),
    responses(
        (status = 200, description = "Page of recipes, newest first"),
        (status = 400, description = "Malformed query")
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    claims: Option<Claims>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, DomainError> {
    let (params, filter) = parse_recipe_query(raw.as_deref())?;
    let page = params.to_request(state.page_size())?;
    let viewer = claims.map(|c| c.user_id);

    let recipes = recipe_service::list_recipes(state.db(), viewer, filter, page).await?;
    Ok(Json(PageResponse::new(
        "/api/recipes",
        raw.as_deref(),
        page,
        recipes,
    )))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    responses(
        (status = 201, description = "Recipe created"),
        (status = 400, description = "Invalid recipe"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown ingredient or tag")
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreateRecipeInput>,
) -> Result<impl IntoResponse, DomainError> {
    let recipe = recipe_service::create_recipe(
        state.db(),
        state.media_root(),
        claims.user_id,
        payload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe found"),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    claims: Option<Claims>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let viewer = claims.map(|c| c.user_id);
    let recipe = recipe_service::get_recipe(state.db(), viewer, id).await?;
    Ok(Json(recipe))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRecipeInput>,
) -> Result<impl IntoResponse, DomainError> {
    let recipe = recipe_service::update_recipe(
        state.db(),
        state.media_root(),
        claims.user_id,
        id,
        payload,
    )
    .await?;
    Ok(Json(recipe))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    recipe_service::delete_recipe(state.db(), state.media_root(), claims.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
