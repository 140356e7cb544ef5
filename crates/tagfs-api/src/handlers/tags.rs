//! Tag HTTP handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use tagfs_core::{CreateTagRequest, Tag, UpdateTagRequest};

use crate::{ApiError, AppState};

/// GET /tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tags.list().await?))
}

/// POST /tags
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> Result<StatusCode, ApiError> {
    state.tags.create(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /tags/:id
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<StatusCode, ApiError> {
    state.tags.update(id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /tags/order
pub async fn reorder_tags(
    State(state): State<AppState>,
    Json(ordered_ids): Json<Vec<i64>>,
) -> Result<StatusCode, ApiError> {
    state.tags.reorder(&ordered_ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tags/:id
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
