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
use super::{ApiError, ApiResponse, AppState, MovieDto};
use crate::db::NewTitle;
use crate::domain::TitleKind;

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub movie_id: String,
    pub title: String,
    pub release_year: i32,
    pub runtime: i32,
    pub age_certification: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

fn to_dtos(records: Vec<crate::db::TitleRecord>) -> Vec<MovieDto> {
    records.into_iter().map(MovieDto::from).collect()
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let filter = query.into_filter()?;
    let movies = state.store().movies().list(&filter).await?;
    Ok(Json(ApiResponse::success(to_dtos(movies))))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let movie = state.store().get_title(TitleKind::Movie, &movie_id).await?;
    Ok(Json(ApiResponse::success(movie.into())))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MovieDto>>), ApiError> {
    let new = validate_new_title(NewTitle {
        source_id: payload.movie_id,
        title: payload.title,
        release_year: payload.release_year,
        age_certification: payload.age_certification,
        runtime: payload.runtime,
        seasons: None,
        description: payload.description,
    })?;
    let genres = genre_names(&payload.genres)?;

    let movie = state
        .store()
        .create_title(TitleKind::Movie, &new, &genres)
        .await?;

    tracing::info!(movie_id = %movie.source_id, "Movie created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(movie.into()))))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Json(payload): Json<TitleUpdate>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    if payload.seasons.is_some() {
        return Err(ApiError::validation("Movies have no seasons"));
    }
    let (changes, genres) = payload.into_changes()?;

    let movie = state
        .store()
        .update_title(TitleKind::Movie, &movie_id, &changes, genres.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(movie.into())))
}

/// `GET /api/movies/by-actor?actor_name=...`
pub async fn movies_by_actor(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ByActorQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let (actor_name, limit) = query.validated()?;
    let movies = state.store().movies().by_actor(actor_name, limit).await?;
    Ok(Json(ApiResponse::success(to_dtos(movies))))
}

/// `GET /api/movies/top-rated`
///
/// Best IMDb score first. Returns a single movie unless `limit` says otherwise.
pub async fn top_rated_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopRatedQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let filter = query.into_filter()?;
    let movies = state
        .store()
        .movies()
        .top_rated(filter.release_year, filter.genre.as_deref(), filter.limit)
        .await?;
    Ok(Json(ApiResponse::success(to_dtos(movies))))
}
