use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::titles::{
    ByActorQuery, TitleQuery, TitleUpdate, TopRatedQuery, genre_names, validate_new_title,
};
use super::{ApiError, ApiResponse, AppState, ShowDto};
use crate::db::{NewTitle, TitleRecord};
use crate::domain::TitleKind;

#[derive(Debug, Deserialize)]
pub struct CreateShowRequest {
    pub show_id: String,
    pub title: String,
    pub release_year: i32,
    pub runtime: i32,
    pub seasons: Option<i32>,
    pub age_certification: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

fn to_dtos(records: Vec<TitleRecord>) -> Vec<ShowDto> {
    records.into_iter().map(ShowDto::from).collect()
}

pub async fn list_shows(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<ApiResponse<Vec<ShowDto>>>, ApiError> {
    let filter = query.into_filter()?;
    let shows = state.store().shows().list(&filter).await?;
    Ok(Json(ApiResponse::success(to_dtos(shows))))
}

/// `GET /api/shows/by-details`
///
/// Same filters as the list endpoint, at least one of them required.
pub async fn shows_by_details(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<ApiResponse<Vec<ShowDto>>>, ApiError> {
    if query.title.is_none()
        && query.release_year.is_none()
        && query.age_certification.is_none()
        && query.genre.is_none()
    {
        return Err(ApiError::validation(
            "At least one of title, release_year, age_certification or genre is required",
        ));
    }

    let filter = query.into_filter()?;
    let shows = state.store().shows().list(&filter).await?;
    Ok(Json(ApiResponse::success(to_dtos(shows))))
}

pub async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
) -> Result<Json<ApiResponse<ShowDto>>, ApiError> {
    let show = state.store().get_title(TitleKind::Show, &show_id).await?;
    Ok(Json(ApiResponse::success(show.into())))
}

pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateShowRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShowDto>>), ApiError> {
    let new = validate_new_title(NewTitle {
        source_id: payload.show_id,
        title: payload.title,
        release_year: payload.release_year,
        age_certification: payload.age_certification,
        runtime: payload.runtime,
        seasons: payload.seasons,
        description: payload.description,
    })?;
    let genres = genre_names(&payload.genres)?;

    let show = state
        .store()
        .create_title(TitleKind::Show, &new, &genres)
        .await?;

    tracing::info!(show_id = %show.source_id, "Show created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(show.into()))))
}

pub async fn update_show(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
    Json(payload): Json<TitleUpdate>,
) -> Result<Json<ApiResponse<ShowDto>>, ApiError> {
    let (changes, genres) = payload.into_changes()?;

    let show = state
        .store()
        .update_title(TitleKind::Show, &show_id, &changes, genres.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(show.into())))
}

pub async fn shows_by_actor(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ByActorQuery>,
) -> Result<Json<ApiResponse<Vec<ShowDto>>>, ApiError> {
    let (actor_name, limit) = query.validated()?;
    let shows = state.store().shows().by_actor(actor_name, limit).await?;
    Ok(Json(ApiResponse::success(to_dtos(shows))))
}

pub async fn top_rated_shows(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopRatedQuery>,
) -> Result<Json<ApiResponse<Vec<ShowDto>>>, ApiError> {
    let filter = query.into_filter()?;
    let shows = state
        .store()
        .shows()
        .top_rated(filter.release_year, filter.genre.as_deref(), filter.limit)
        .await?;
    Ok(Json(ApiResponse::success(to_dtos(shows))))
}
