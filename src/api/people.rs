use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{optional_filter, page_limit, validate_id, validate_required};
use super::{ApiError, ApiResponse, AppState, PersonDto};
use crate::db::repositories::person::PersonChanges;

#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    pub name: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub external_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePersonRequest {
    pub name: Option<String>,
    pub external_id: Option<String>,
}

pub async fn list_people(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeopleQuery>,
) -> Result<Json<ApiResponse<Vec<PersonDto>>>, ApiError> {
    let name = optional_filter("name", query.name.as_deref(), 1, 50)?;
    let limit = page_limit(query.limit)?;

    let people = state
        .store()
        .people()
        .list(name.as_deref(), query.skip, limit)
        .await?;

    Ok(Json(ApiResponse::success(
        people.into_iter().map(PersonDto::from).collect(),
    )))
}

pub async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PersonDto>>, ApiError> {
    let id = validate_id(id)?;
    let person = state.store().people().get(id).await?;
    Ok(Json(ApiResponse::success(person.into())))
}

pub async fn create_person(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePersonRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PersonDto>>), ApiError> {
    let name = validate_required("name", &payload.name)?;
    let external_id = payload
        .external_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let person = state.store().people().create(name, external_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(person.into()))))
}

pub async fn update_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePersonRequest>,
) -> Result<Json<ApiResponse<PersonDto>>, ApiError> {
    let id = validate_id(id)?;
    let changes = PersonChanges {
        name: payload
            .name
            .as_deref()
            .map(|n| validate_required("name", n).map(str::to_string))
            .transpose()?,
        external_id: payload.external_id.map(|e| e.trim().to_string()),
    };

    let person = state.store().people().update(id, &changes).await?;
    Ok(Json(ApiResponse::success(person.into())))
}
