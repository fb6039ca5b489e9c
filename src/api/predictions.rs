use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{optional_filter, page_limit, validate_length};
use super::{ApiError, ApiResponse, AppState, PredictionDto};

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub user_id: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePredictionRequest {
    pub user_id: String,
    pub title_ref: Option<String>,
    pub prediction_value: f64,
}

pub async fn list_predictions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PredictionQuery>,
) -> Result<Json<ApiResponse<Vec<PredictionDto>>>, ApiError> {
    let user_id = optional_filter("user_id", query.user_id.as_deref(), 1, 50)?;
    let limit = page_limit(query.limit)?;

    let predictions = state
        .store()
        .predictions()
        .list(user_id.as_deref(), query.skip, limit)
        .await?;

    Ok(Json(ApiResponse::success(
        predictions.into_iter().map(PredictionDto::from).collect(),
    )))
}

pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePredictionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PredictionDto>>), ApiError> {
    let user_id = validate_length("user_id", &payload.user_id, 1, 50)?;
    if !payload.prediction_value.is_finite() {
        return Err(ApiError::validation("prediction_value must be a finite number"));
    }
    let title_ref = payload
        .title_ref
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let prediction = state
        .store()
        .predictions()
        .create(user_id, title_ref, payload.prediction_value)
        .await?;

    tracing::debug!(user_id, id = prediction.id, "Prediction recorded");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(prediction.into())),
    ))
}
