use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{
    optional_filter, page_limit, validate_id, validate_required, validate_score, validate_votes,
};
use super::{ApiError, ApiResponse, AppState, RatingDto};
use crate::db::repositories::rating::{NewRating, RatingFilter};
use crate::domain::TitleKind;

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub source: Option<String>,
    pub min_score: Option<f64>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

/// Exactly one of `movie_id` / `show_id` (internal row ids) must be set.
#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub movie_id: Option<i32>,
    pub show_id: Option<i32>,
    pub source: String,
    pub external_id: Option<String>,
    pub score: f64,
    pub votes: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    pub score: Option<f64>,
    pub votes: Option<i64>,
}

pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatingQuery>,
) -> Result<Json<ApiResponse<Vec<RatingDto>>>, ApiError> {
    let filter = RatingFilter {
        source: optional_filter("source", query.source.as_deref(), 1, 20)?
            .map(|s| s.to_lowercase()),
        min_score: query
            .min_score
            .map(|s| validate_score("min_score", s))
            .transpose()?,
        skip: query.skip,
        limit: page_limit(query.limit)?,
    };

    let ratings = state.store().ratings().list(&filter).await?;
    Ok(Json(ApiResponse::success(
        ratings.into_iter().map(RatingDto::from).collect(),
    )))
}

pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RatingDto>>, ApiError> {
    let id = validate_id(id)?;
    let rating = state.store().ratings().get(id).await?;
    Ok(Json(ApiResponse::success(rating.into())))
}

/// A second rating from the same source for the same title, or an unknown
/// title id, is rejected with 409.
pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RatingDto>>), ApiError> {
    let (kind, parent_id) = match (payload.movie_id, payload.show_id) {
        (Some(id), None) => (TitleKind::Movie, validate_id(id)?),
        (None, Some(id)) => (TitleKind::Show, validate_id(id)?),
        _ => {
            return Err(ApiError::validation(
                "Exactly one of movie_id or show_id must be set",
            ));
        }
    };

    let new = NewRating {
        kind,
        parent_id,
        source: validate_required("source", &payload.source)?.to_lowercase(),
        external_id: payload.external_id,
        score: validate_score("score", payload.score)?,
        votes: payload.votes.map(validate_votes).transpose()?,
    };

    let rating = state.store().ratings().create(&new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rating.into()))))
}

pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRatingRequest>,
) -> Result<Json<ApiResponse<RatingDto>>, ApiError> {
    let id = validate_id(id)?;
    let score = payload
        .score
        .map(|s| validate_score("score", s))
        .transpose()?;
    let votes = payload.votes.map(validate_votes).transpose()?;

    let rating = state.store().ratings().update(id, score, votes).await?;
    Ok(Json(ApiResponse::success(rating.into())))
}
