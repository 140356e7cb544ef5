//! File HTTP handlers.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use tagfs_core::{CreateFileRequest, FileQuery, FileWithTags};

use crate::{ApiError, AppState};

/// Request body for replacing a file's tag set.
#[derive(Debug, Deserialize)]
pub struct UpdateFileTagsRequest {
    pub tags: Vec<i64>,
}

/// GET /files
pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<FileWithTags>>, ApiError> {
    Ok(Json(state.files.search(&FileQuery::default()).await?))
}

/// POST /files/search
///
/// An absent or empty body matches all files.
pub async fn search_files(
    State(state): State<AppState>,
    body: Option<Json<FileQuery>>,
) -> Result<Json<Vec<FileWithTags>>, ApiError> {
    let query = body.map(|Json(q)| q).unwrap_or_default();
    Ok(Json(state.files.search(&query).await?))
}

/// POST /files
pub async fn create_file(
    State(state): State<AppState>,
    Json(req): Json<CreateFileRequest>,
) -> Result<StatusCode, ApiError> {
    state.files.add(&req.path, &req.tags).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /files/:id
pub async fn update_file_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFileTagsRequest>,
) -> Result<StatusCode, ApiError> {
    state.files.update_tags(id, &req.tags).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /files/:id
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.files.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /files/:id/content
///
/// Streams the registered file's bytes from disk.
pub async fn file_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let path = state.files.path_of(id).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(tagfs_core::Error::Io)?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    ))
}
