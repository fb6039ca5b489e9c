use serde::{Deserialize, Serialize};

use crate::db::{TableCounts, TitleRecord};
use crate::entities::{genres, people, predictions, ratings};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDto {
    pub id: i32,
    pub movie_id: String,
    pub title: String,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub runtime: i32,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub imdb_score: Option<f64>,
    pub imdb_votes: Option<i64>,
    pub created_at: String,
}

impl From<TitleRecord> for MovieDto {
    fn from(r: TitleRecord) -> Self {
        Self {
            id: r.id,
            movie_id: r.source_id,
            title: r.title,
            release_year: r.release_year,
            age_certification: r.age_certification,
            runtime: r.runtime,
            description: r.description,
            genres: r.genres,
            imdb_score: r.imdb_score,
            imdb_votes: r.imdb_votes,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowDto {
    pub id: i32,
    pub show_id: String,
    pub title: String,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub runtime: i32,
    pub seasons: Option<i32>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub imdb_score: Option<f64>,
    pub imdb_votes: Option<i64>,
    pub created_at: String,
}

impl From<TitleRecord> for ShowDto {
    fn from(r: TitleRecord) -> Self {
        Self {
            id: r.id,
            show_id: r.source_id,
            title: r.title,
            release_year: r.release_year,
            age_certification: r.age_certification,
            runtime: r.runtime,
            seasons: r.seasons,
            description: r.description,
            genres: r.genres,
            imdb_score: r.imdb_score,
            imdb_votes: r.imdb_votes,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreDto {
    pub id: i32,
    pub name: String,
}

impl From<genres::Model> for GenreDto {
    fn from(m: genres::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonDto {
    pub id: i32,
    pub name: String,
    pub external_id: Option<String>,
}

impl From<people::Model> for PersonDto {
    fn from(m: people::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            external_id: m.external_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingDto {
    pub id: i32,
    pub movie_id: Option<i32>,
    pub show_id: Option<i32>,
    pub source: String,
    pub external_id: Option<String>,
    pub score: f64,
    pub votes: Option<i64>,
}

impl From<ratings::Model> for RatingDto {
    fn from(m: ratings::Model) -> Self {
        Self {
            id: m.id,
            movie_id: m.movie_id,
            show_id: m.show_id,
            source: m.source,
            external_id: m.external_id,
            score: m.score,
            votes: m.votes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionDto {
    pub id: i32,
    pub user_id: String,
    pub title_ref: Option<String>,
    pub prediction_value: f64,
    pub created_at: String,
}

impl From<predictions::Model> for PredictionDto {
    fn from(m: predictions::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            title_ref: m.title_ref,
            prediction_value: m.prediction_value,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub tables: TableCounts,
}
