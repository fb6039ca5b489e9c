use super::{like_contains, like_exact};
use super::title::{NewTitle, TitleChanges, TitleFilter, TitleRecord, attach_details};
use crate::db::{StoreError, StoreResult};
use crate::domain::{CreditRole, IMDB_SOURCE, TitleKind, normalize_key};
use crate::entities::{genres, movie_credits, movie_genres, movies, people, prelude::*, ratings};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn active_model(new: &NewTitle) -> movies::ActiveModel {
        movies::ActiveModel {
            movie_id: Set(new.source_id.clone()),
            title: Set(new.title.clone()),
            release_year: Set(new.release_year),
            age_certification: Set(new.age_certification.clone()),
            runtime: Set(new.runtime),
            description: Set(new.description.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
    }

    fn with_genre(query: Select<Movies>, genre: &str) -> Select<Movies> {
        query
            .join(JoinType::InnerJoin, movies::Relation::MovieGenres.def())
            .join(JoinType::InnerJoin, movie_genres::Relation::Genre.def())
            .filter(genres::Column::NormalizedName.eq(normalize_key(genre)))
    }

    async fn detailed(&self, rows: Vec<movies::Model>) -> StoreResult<Vec<TitleRecord>> {
        let records = rows.into_iter().map(TitleRecord::from).collect();
        attach_details(&self.conn, TitleKind::Movie, records).await
    }

    /// Inserts unless a movie with the same source id exists. Returns whether a row was written.
    pub async fn insert_if_absent(&self, new: &NewTitle) -> StoreResult<bool> {
        let inserted = Movies::insert(Self::active_model(new))
            .on_conflict(
                OnConflict::column(movies::Column::MovieId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(inserted > 0)
    }

    /// Plain insert; a taken source id surfaces as a constraint error.
    pub async fn create_in<C: ConnectionTrait>(conn: &C, new: &NewTitle) -> StoreResult<i32> {
        let res = Movies::insert(Self::active_model(new))
            .exec(conn)
            .await?;
        Ok(res.last_insert_id)
    }

    pub async fn find_id(&self, source_id: &str) -> StoreResult<Option<i32>> {
        let row = Movies::find()
            .filter(movies::Column::MovieId.eq(source_id))
            .one(&self.conn)
            .await?;
        Ok(row.map(|m| m.id))
    }

    pub async fn get(&self, source_id: &str) -> StoreResult<TitleRecord> {
        let row = Movies::find()
            .filter(movies::Column::MovieId.eq(source_id))
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("movie", source_id))?;

        self.detailed(vec![row])
            .await?
            .pop()
            .ok_or_else(|| StoreError::not_found("movie", source_id))
    }

    pub async fn list(&self, filter: &TitleFilter) -> StoreResult<Vec<TitleRecord>> {
        let mut query = Movies::find();

        if let Some(title) = &filter.title {
            query = query.filter(movies::Column::Title.like(like_contains(title)));
        }
        if let Some(year) = filter.release_year {
            query = query.filter(movies::Column::ReleaseYear.eq(year));
        }
        if let Some(cert) = &filter.age_certification {
            query = query.filter(movies::Column::AgeCertification.like(like_exact(cert)));
        }
        if let Some(genre) = &filter.genre {
            query = Self::with_genre(query, genre);
        }

        let rows = query
            .order_by_asc(movies::Column::Id)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&self.conn)
            .await?;

        self.detailed(rows).await
    }

    /// Returns the internal id of the updated movie.
    pub async fn update_in<C: ConnectionTrait>(
        conn: &C,
        source_id: &str,
        changes: &TitleChanges,
    ) -> StoreResult<i32> {
        let model = Movies::find()
            .filter(movies::Column::MovieId.eq(source_id))
            .one(conn)
            .await?
            .ok_or_else(|| StoreError::not_found("movie", source_id))?;

        let id = model.id;
        let mut active: movies::ActiveModel = model.into();

        if let Some(title) = &changes.title {
            active.title = Set(title.clone());
        }
        if let Some(year) = changes.release_year {
            active.release_year = Set(year);
        }
        if let Some(cert) = &changes.age_certification {
            active.age_certification = Set(Some(cert.clone()));
        }
        if let Some(runtime) = changes.runtime {
            active.runtime = Set(runtime);
        }
        if let Some(description) = &changes.description {
            active.description = Set(Some(description.clone()));
        }

        if active.is_changed() {
            active.update(conn).await?;
        }

        Ok(id)
    }

    /// Movies crediting an actor whose name contains `actor_name`.
    pub async fn by_actor(&self, actor_name: &str, limit: u64) -> StoreResult<Vec<TitleRecord>> {
        let rows = Movies::find()
            .join(JoinType::InnerJoin, movies::Relation::MovieCredits.def())
            .join(JoinType::InnerJoin, movie_credits::Relation::Person.def())
            .filter(movie_credits::Column::Role.eq(CreditRole::Actor.as_str()))
            .filter(people::Column::Name.like(like_contains(actor_name)))
            .distinct()
            .order_by_asc(movies::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        self.detailed(rows).await
    }

    /// Highest IMDb score first; ties broken by insertion order.
    pub async fn top_rated(
        &self,
        release_year: Option<i32>,
        genre: Option<&str>,
        limit: u64,
    ) -> StoreResult<Vec<TitleRecord>> {
        let mut query = Movies::find()
            .join(JoinType::InnerJoin, movies::Relation::Ratings.def())
            .filter(ratings::Column::Source.eq(IMDB_SOURCE));

        if let Some(year) = release_year {
            query = query.filter(movies::Column::ReleaseYear.eq(year));
        }
        if let Some(genre) = genre {
            query = Self::with_genre(query, genre);
        }

        let rows = query
            .order_by_desc(ratings::Column::Score)
            .order_by_asc(movies::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        self.detailed(rows).await
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(Movies::find().count(&self.conn).await?)
    }
}
