use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::api::pagination::{PageParams, PageResponse};
use crate::auth::Claims;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::subscription_service;

#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimitParams {
    /// Cap on the recipe cards embedded per author
    pub recipes_limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<u64>,
}

pub async fn subscribe(
    State(state): State<AppState>,
    claims: Claims,
    Path(author_id): Path<i32>,
    Query(params): Query<RecipesLimitParams>,
) -> Result<impl IntoResponse, DomainError> {
    let card = subscription_service::subscribe(
        state.db(),
        claims.user_id,
        author_id,
        params.recipes_limit,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    claims: Claims,
    Path(author_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    subscription_service::unsubscribe(state.db(), claims.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<SubscriptionListParams>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, DomainError> {
    let page = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .to_request(state.page_size())?;

    let authors = subscription_service::list_subscriptions(
        state.db(),
        claims.user_id,
        page,
        params.recipes_limit,
    )
    .await?;
    Ok(Json(PageResponse::new(
        "/api/users/subscriptions",
        raw.as_deref(),
        page,
        authors,
    )))
}
