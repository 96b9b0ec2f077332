use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, DomainError> {
    let tags = state.tag_repo.find_all().await?;
    Ok(Json(tags))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let tag = state
        .tag_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Tag {}", id)))?;
    Ok(Json(tag))
}
