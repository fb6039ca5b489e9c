use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{page_limit, validate_id, validate_required};
use super::{ApiError, ApiResponse, AppState, GenreDto};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    pub name: String,
}

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<GenreDto>>>, ApiError> {
    let limit = page_limit(query.limit)?;
    let genres = state.store().genres().list(query.skip, limit).await?;
    Ok(Json(ApiResponse::success(
        genres.into_iter().map(GenreDto::from).collect(),
    )))
}

pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GenreDto>>, ApiError> {
    let id = validate_id(id)?;
    let genre = state.store().genres().get(id).await?;
    Ok(Json(ApiResponse::success(genre.into())))
}

/// Fails with 409 when a genre with the same normalized name exists.
pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GenreDto>>), ApiError> {
    let name = validate_required("name", &payload.name)?;
    let genre = state.store().genres().create(name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(genre.into()))))
}

pub async fn rename_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<GenreRequest>,
) -> Result<Json<ApiResponse<GenreDto>>, ApiError> {
    let id = validate_id(id)?;
    let name = validate_required("name", &payload.name)?;
    let genre = state.store().genres().rename(id, name).await?;
    Ok(Json(ApiResponse::success(genre.into())))
}
