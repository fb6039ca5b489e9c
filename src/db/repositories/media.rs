use super::{like_contains, like_exact};
use crate::db::StoreResult;
use sea_orm::sea_query::{Alias, Expr, Order, Query};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult};
use serde::Serialize;

const MEDIA_VIEW: &str = "media_view";

const MEDIA_COLUMNS: [&str; 14] = [
    "media_type",
    "source_id",
    "title",
    "release_year",
    "age_certification",
    "runtime",
    "seasons",
    "genre",
    "country",
    "director",
    "actor",
    "character_name",
    "imdb_score",
    "imdb_votes",
];

/// One row of `media_view`: a title combined with one genre, country,
/// director, actor/character pair and its IMDb rating.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct MediaRow {
    pub media_type: String,
    pub source_id: String,
    pub title: String,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub runtime: i32,
    pub seasons: Option<i32>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
    pub character_name: Option<String>,
    pub imdb_score: Option<f64>,
    pub imdb_votes: Option<i64>,
}

/// Text filters are case-insensitive substring matches except
/// `media_type` and `age_certification`, which match whole values.
/// `imdb_score` and `imdb_votes` are strict lower bounds.
#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub age_certification: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
    pub character: Option<String>,
    pub imdb_score: Option<f64>,
    pub imdb_votes: Option<i64>,
    pub skip: u64,
    pub limit: u64,
}

pub struct MediaRepository {
    conn: DatabaseConnection,
}

fn col(name: &str) -> Expr {
    Expr::col(Alias::new(name))
}

impl MediaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn search(&self, filter: &MediaFilter) -> StoreResult<Vec<MediaRow>> {
        let mut select = Query::select();
        select
            .columns(MEDIA_COLUMNS.iter().map(|c| Alias::new(*c)))
            .from(Alias::new(MEDIA_VIEW));

        let substring_filters = [
            ("title", &filter.title),
            ("genre", &filter.genre),
            ("country", &filter.country),
            ("director", &filter.director),
            ("actor", &filter.actor),
            ("character_name", &filter.character),
        ];
        for (column, value) in substring_filters {
            if let Some(value) = value {
                select.and_where(col(column).like(like_contains(value)));
            }
        }

        if let Some(media_type) = &filter.media_type {
            select.and_where(col("media_type").eq(media_type.to_lowercase()));
        }
        if let Some(cert) = &filter.age_certification {
            select.and_where(col("age_certification").like(like_exact(cert)));
        }
        if let Some(year) = filter.release_year {
            select.and_where(col("release_year").eq(year));
        }
        if let Some(score) = filter.imdb_score {
            select.and_where(col("imdb_score").gt(score));
        }
        if let Some(votes) = filter.imdb_votes {
            select.and_where(col("imdb_votes").gt(votes));
        }

        select
            .order_by(Alias::new("media_type"), Order::Asc)
            .order_by(Alias::new("source_id"), Order::Asc)
            .offset(filter.skip)
            .limit(filter.limit);

        let stmt = self.conn.get_database_backend().build(&select);
        Ok(MediaRow::find_by_statement(stmt).all(&self.conn).await?)
    }
}
