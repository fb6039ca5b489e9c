use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{
    optional_filter, page_limit, validate_release_year, validate_score, validate_votes,
};
use super::{ApiError, ApiResponse, AppState};
use crate::db::{MediaFilter, MediaRow};
use crate::domain::TitleKind;

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub age_certification: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
    pub character: Option<String>,
    /// Strictly greater than
    pub imdb_score: Option<f64>,
    /// Strictly greater than
    pub imdb_votes: Option<i64>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

impl MediaQuery {
    fn into_filter(self) -> Result<MediaFilter, ApiError> {
        let media_type = self
            .media_type
            .as_deref()
            .map(|t| {
                t.parse::<TitleKind>()
                    .map(|k| k.as_str().to_string())
                    .map_err(ApiError::validation)
            })
            .transpose()?;

        Ok(MediaFilter {
            media_type,
            title: optional_filter("title", self.title.as_deref(), 3, 50)?,
            release_year: self.release_year.map(validate_release_year).transpose()?,
            age_certification: optional_filter(
                "age_certification",
                self.age_certification.as_deref(),
                1,
                10,
            )?,
            genre: optional_filter("genre", self.genre.as_deref(), 1, 20)?,
            country: optional_filter("country", self.country.as_deref(), 1, 10)?,
            director: optional_filter("director", self.director.as_deref(), 1, 50)?,
            actor: optional_filter("actor", self.actor.as_deref(), 1, 50)?,
            character: optional_filter("character", self.character.as_deref(), 1, 50)?,
            imdb_score: self
                .imdb_score
                .map(|s| validate_score("imdb_score", s))
                .transpose()?,
            imdb_votes: self.imdb_votes.map(validate_votes).transpose()?,
            skip: self.skip,
            limit: page_limit(self.limit)?,
        })
    }
}

/// `GET /api/media`
///
/// Searches the combined movie/show view. Each row is one combination of
/// title, genre, country, director, actor and character.
pub async fn search_media(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MediaQuery>,
) -> Result<Json<ApiResponse<Vec<MediaRow>>>, ApiError> {
    let filter = query.into_filter()?;
    let rows = state.store().media().search(&filter).await?;
    Ok(Json(ApiResponse::success(rows)))
}
