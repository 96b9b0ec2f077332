use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::api::pagination::{PageParams, PageResponse};
use crate::auth::Claims;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::user_service::{self, RegisterInput};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInput>,
) -> Result<impl IntoResponse, DomainError> {
    let user = user_service::register(state.db(), payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    claims: Option<Claims>,
    Query(params): Query<PageParams>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, DomainError> {
    let page = params.to_request(state.page_size())?;
    let viewer = claims.map(|c| c.user_id);
    let users = user_service::list_users(state.db(), viewer, page).await?;
    Ok(Json(PageResponse::new(
        "/api/users",
        raw.as_deref(),
        page,
        users,
    )))
}

pub async fn get_user(
    State(state): State<AppState>,
    claims: Option<Claims>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let viewer = claims.map(|c| c.user_id);
    let user = user_service::get_user(state.db(), viewer, id).await?;
    Ok(Json(user))
}

pub async fn me(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, DomainError> {
    let user = user_service::get_user(state.db(), Some(claims.user_id), claims.user_id)
        .await
        .map_err(|e| match e {
            // token outlived its account
            DomainError::NotFound(_) => {
                DomainError::Unauthorized("Account no longer exists".to_string())
            }
            other => other,
        })?;
    Ok(Json(user))
}
