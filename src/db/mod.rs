use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
    TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::TitleKind;

pub mod migrator;
pub mod repositories;

use repositories::genre::GenreRepository;
use repositories::link::LinkRepository;
use repositories::movie::MovieRepository;
use repositories::show::ShowRepository;

pub use repositories::media::{MediaFilter, MediaRow};
pub use repositories::title::{NewTitle, TitleChanges, TitleFilter, TitleRecord};

/// Errors surfaced by repository calls.
///
/// Constraint violations are split out of `DbErr` so callers can tell a
/// rejected write (409) from a broken database (500).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg),
            ) => Self::Constraint(msg),
            _ => Self::Database(err),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Row counts per table, reported by `/api/system/status`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct TableCounts {
    pub movies: u64,
    pub shows: u64,
    pub genres: u64,
    pub countries: u64,
    pub people: u64,
    pub characters: u64,
    pub ratings: u64,
    pub predictions: u64,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to `:memory:` would open its own empty database.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    pub fn movies(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    pub fn shows(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    pub fn genres(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    pub fn countries(&self) -> repositories::country::CountryRepository {
        repositories::country::CountryRepository::new(self.conn.clone())
    }

    pub fn people(&self) -> repositories::person::PersonRepository {
        repositories::person::PersonRepository::new(self.conn.clone())
    }

    pub fn characters(&self) -> repositories::character::CharacterRepository {
        repositories::character::CharacterRepository::new(self.conn.clone())
    }

    pub fn ratings(&self) -> repositories::rating::RatingRepository {
        repositories::rating::RatingRepository::new(self.conn.clone())
    }

    pub fn links(&self) -> repositories::link::LinkRepository {
        repositories::link::LinkRepository::new(self.conn.clone())
    }

    pub fn media(&self) -> repositories::media::MediaRepository {
        repositories::media::MediaRepository::new(self.conn.clone())
    }

    pub fn predictions(&self) -> repositories::prediction::PredictionRepository {
        repositories::prediction::PredictionRepository::new(self.conn.clone())
    }

    /// Creates a title and links it to the named genres. Nothing is written
    /// unless every step succeeds.
    pub async fn create_title(
        &self,
        kind: TitleKind,
        new: &NewTitle,
        genres: &[String],
    ) -> StoreResult<TitleRecord> {
        let txn = self.conn.begin().await?;

        let parent_id = match kind {
            TitleKind::Movie => MovieRepository::create_in(&txn, new).await?,
            TitleKind::Show => ShowRepository::create_in(&txn, new).await?,
        };
        Self::assign_genres(&txn, kind, parent_id, genres).await?;

        txn.commit().await?;
        self.get_title(kind, &new.source_id).await
    }

    /// Applies scalar changes; a present genre list replaces the current set.
    /// Runs in one transaction.
    pub async fn update_title(
        &self,
        kind: TitleKind,
        source_id: &str,
        changes: &TitleChanges,
        genres: Option<&[String]>,
    ) -> StoreResult<TitleRecord> {
        let txn = self.conn.begin().await?;

        let parent_id = match kind {
            TitleKind::Movie => MovieRepository::update_in(&txn, source_id, changes).await?,
            TitleKind::Show => ShowRepository::update_in(&txn, source_id, changes).await?,
        };

        if let Some(genres) = genres {
            LinkRepository::clear_genres_in(&txn, kind, parent_id).await?;
            Self::assign_genres(&txn, kind, parent_id, genres).await?;
        }

        txn.commit().await?;
        self.get_title(kind, source_id).await
    }

    pub async fn get_title(&self, kind: TitleKind, source_id: &str) -> StoreResult<TitleRecord> {
        match kind {
            TitleKind::Movie => self.movies().get(source_id).await,
            TitleKind::Show => self.shows().get(source_id).await,
        }
    }

    async fn assign_genres<C: ConnectionTrait>(
        conn: &C,
        kind: TitleKind,
        parent_id: i32,
        genres: &[String],
    ) -> StoreResult<()> {
        for name in genres {
            let (genre, _) = GenreRepository::find_or_create_in(conn, name).await?;
            LinkRepository::link_genre_in(conn, kind, parent_id, genre.id).await?;
        }
        Ok(())
    }

    pub async fn table_counts(&self) -> StoreResult<TableCounts> {
        Ok(TableCounts {
            movies: self.movies().count().await?,
            shows: self.shows().count().await?,
            genres: self.genres().count().await?,
            countries: self.countries().count().await?,
            people: self.people().count().await?,
            characters: self.characters().count().await?,
            ratings: self.ratings().count().await?,
            predictions: self.predictions().count().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_sql_errors_stay_database_errors() {
        let err = DbErr::Custom("boom".to_string());
        assert!(matches!(StoreError::from(err), StoreError::Database(_)));
    }

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = StoreError::not_found("movie", "tm123");
        assert_eq!(err.to_string(), "movie not found: tm123");
    }
}
