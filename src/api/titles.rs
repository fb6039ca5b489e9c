//! Request handling shared by the movie and show endpoints.

use serde::Deserialize;

use super::ApiError;
use super::validation::{
    optional_filter, page_limit, validate_length, validate_non_negative, validate_release_year,
    validate_required,
};
use crate::db::{NewTitle, TitleChanges, TitleFilter};

/// Query string of `GET /movies`, `GET /shows` and `GET /shows/by-details`.
#[derive(Debug, Default, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub age_certification: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

impl TitleQuery {
    pub fn into_filter(self) -> Result<TitleFilter, ApiError> {
        Ok(TitleFilter {
            title: optional_filter("title", self.title.as_deref(), 3, 50)?,
            genre: optional_filter("genre", self.genre.as_deref(), 1, 20)?,
            release_year: self.release_year.map(validate_release_year).transpose()?,
            age_certification: optional_filter(
                "age_certification",
                self.age_certification.as_deref(),
                1,
                10,
            )?,
            skip: self.skip,
            limit: page_limit(self.limit)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ByActorQuery {
    pub actor_name: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TopRatedQuery {
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub limit: Option<u64>,
}

pub struct TopRatedFilter {
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub limit: u64,
}

impl TopRatedQuery {
    pub fn into_filter(self) -> Result<TopRatedFilter, ApiError> {
        Ok(TopRatedFilter {
            release_year: self.release_year.map(validate_release_year).transpose()?,
            genre: optional_filter("genre", self.genre.as_deref(), 1, 20)?,
            limit: page_limit(Some(self.limit.unwrap_or(1)))?,
        })
    }
}

impl ByActorQuery {
    pub fn validated(&self) -> Result<(&str, u64), ApiError> {
        let name = validate_length("actor_name", &self.actor_name, 1, 50)?;
        Ok((name, page_limit(self.limit)?))
    }
}

/// Partial update body shared by `PUT /movies/{id}` and `PUT /shows/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct TitleUpdate {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub age_certification: Option<String>,
    pub runtime: Option<i32>,
    pub seasons: Option<i32>,
    pub description: Option<String>,
    pub genres: Option<Vec<String>>,
}

impl TitleUpdate {
    pub fn into_changes(self) -> Result<(TitleChanges, Option<Vec<String>>), ApiError> {
        let changes = TitleChanges {
            title: self
                .title
                .as_deref()
                .map(|t| validate_required("title", t).map(str::to_string))
                .transpose()?,
            release_year: self.release_year.map(validate_release_year).transpose()?,
            age_certification: trimmed(self.age_certification),
            runtime: self
                .runtime
                .map(|r| validate_non_negative("runtime", r))
                .transpose()?,
            seasons: self
                .seasons
                .map(|s| validate_non_negative("seasons", s))
                .transpose()?,
            description: trimmed(self.description),
        };
        let genres = self.genres.as_deref().map(genre_names).transpose()?;
        Ok((changes, genres))
    }
}

/// Checks and trims the fields of a title about to be created.
pub fn validate_new_title(new: NewTitle) -> Result<NewTitle, ApiError> {
    Ok(NewTitle {
        source_id: validate_required("id", &new.source_id)?.to_string(),
        title: validate_required("title", &new.title)?.to_string(),
        release_year: validate_release_year(new.release_year)?,
        age_certification: trimmed(new.age_certification),
        runtime: validate_non_negative("runtime", new.runtime)?,
        seasons: new
            .seasons
            .map(|s| validate_non_negative("seasons", s))
            .transpose()?,
        description: trimmed(new.description),
    })
}

/// Genre names from a request body. Blank names are rejected.
pub fn genre_names(genres: &[String]) -> Result<Vec<String>, ApiError> {
    genres
        .iter()
        .map(|g| validate_required("genre", g).map(str::to_string))
        .collect()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
