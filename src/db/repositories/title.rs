use crate::db::StoreResult;
use crate::domain::{IMDB_SOURCE, TitleKind};
use crate::entities::{genres, movie_genres, movies, prelude::*, ratings, show_genres, shows};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::HashMap;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: u64 = 100;

/// Fields needed to insert a movie or show. `seasons` is ignored for movies.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTitle {
    pub source_id: String,
    pub title: String,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub runtime: i32,
    pub seasons: Option<i32>,
    pub description: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub age_certification: Option<String>,
    pub runtime: Option<i32>,
    pub seasons: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TitleFilter {
    /// Case-insensitive substring match
    pub title: Option<String>,
    /// Exact genre name, case-insensitive
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub age_certification: Option<String>,
    pub skip: u64,
    pub limit: u64,
}

impl Default for TitleFilter {
    fn default() -> Self {
        Self {
            title: None,
            genre: None,
            release_year: None,
            age_certification: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// A movie or show with its genre names and IMDb rating attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRecord {
    pub id: i32,
    pub kind: TitleKind,
    pub source_id: String,
    pub title: String,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub runtime: i32,
    pub seasons: Option<i32>,
    pub description: Option<String>,
    pub created_at: String,
    pub genres: Vec<String>,
    pub imdb_score: Option<f64>,
    pub imdb_votes: Option<i64>,
}

impl From<movies::Model> for TitleRecord {
    fn from(m: movies::Model) -> Self {
        Self {
            id: m.id,
            kind: TitleKind::Movie,
            source_id: m.movie_id,
            title: m.title,
            release_year: m.release_year,
            age_certification: m.age_certification,
            runtime: m.runtime,
            seasons: None,
            description: m.description,
            created_at: m.created_at,
            genres: Vec::new(),
            imdb_score: None,
            imdb_votes: None,
        }
    }
}

impl From<shows::Model> for TitleRecord {
    fn from(s: shows::Model) -> Self {
        Self {
            id: s.id,
            kind: TitleKind::Show,
            source_id: s.show_id,
            title: s.title,
            release_year: s.release_year,
            age_certification: s.age_certification,
            runtime: s.runtime,
            seasons: s.seasons,
            description: s.description,
            created_at: s.created_at,
            genres: Vec::new(),
            imdb_score: None,
            imdb_votes: None,
        }
    }
}

/// Fills in genre names and the IMDb rating for a page of titles of one kind.
pub(crate) async fn attach_details(
    conn: &DatabaseConnection,
    kind: TitleKind,
    mut records: Vec<TitleRecord>,
) -> StoreResult<Vec<TitleRecord>> {
    if records.is_empty() {
        return Ok(records);
    }

    let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
    let mut genre_names = genre_names_for(conn, kind, &ids).await?;
    let mut imdb = imdb_for(conn, kind, &ids).await?;

    for record in &mut records {
        record.genres = genre_names.remove(&record.id).unwrap_or_default();
        if let Some(rating) = imdb.remove(&record.id) {
            record.imdb_score = Some(rating.score);
            record.imdb_votes = rating.votes;
        }
    }

    Ok(records)
}

async fn genre_names_for(
    conn: &DatabaseConnection,
    kind: TitleKind,
    ids: &[i32],
) -> StoreResult<HashMap<i32, Vec<String>>> {
    let mut out: HashMap<i32, Vec<String>> = HashMap::new();

    match kind {
        TitleKind::Movie => {
            let rows = MovieGenres::find()
                .find_also_related(Genres)
                .filter(movie_genres::Column::MovieId.is_in(ids.to_vec()))
                .order_by_asc(movie_genres::Column::GenreId)
                .all(conn)
                .await?;
            for (link, genre) in rows {
                if let Some(genres::Model { name, .. }) = genre {
                    out.entry(link.movie_id).or_default().push(name);
                }
            }
        }
        TitleKind::Show => {
            let rows = ShowGenres::find()
                .find_also_related(Genres)
                .filter(show_genres::Column::ShowId.is_in(ids.to_vec()))
                .order_by_asc(show_genres::Column::GenreId)
                .all(conn)
                .await?;
            for (link, genre) in rows {
                if let Some(genres::Model { name, .. }) = genre {
                    out.entry(link.show_id).or_default().push(name);
                }
            }
        }
    }

    Ok(out)
}

async fn imdb_for(
    conn: &DatabaseConnection,
    kind: TitleKind,
    ids: &[i32],
) -> StoreResult<HashMap<i32, ratings::Model>> {
    let parent_col = match kind {
        TitleKind::Movie => ratings::Column::MovieId,
        TitleKind::Show => ratings::Column::ShowId,
    };

    let rows = Ratings::find()
        .filter(ratings::Column::Source.eq(IMDB_SOURCE))
        .filter(parent_col.is_in(ids.to_vec()))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            let parent = match kind {
                TitleKind::Movie => r.movie_id,
                TitleKind::Show => r.show_id,
            };
            parent.map(|id| (id, r))
        })
        .collect())
}
