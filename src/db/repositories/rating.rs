use crate::db::{StoreError, StoreResult};
use crate::domain::TitleKind;
use crate::entities::{prelude::*, ratings};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub kind: TitleKind,
    pub parent_id: i32,
    pub source: String,
    pub external_id: Option<String>,
    pub score: f64,
    pub votes: Option<i64>,
}

impl NewRating {
    fn active_model(&self) -> ratings::ActiveModel {
        let (movie_id, show_id) = match self.kind {
            TitleKind::Movie => (Some(self.parent_id), None),
            TitleKind::Show => (None, Some(self.parent_id)),
        };

        ratings::ActiveModel {
            movie_id: Set(movie_id),
            show_id: Set(show_id),
            source: Set(self.source.clone()),
            external_id: Set(self.external_id.clone()),
            score: Set(self.score),
            votes: Set(self.votes),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RatingFilter {
    pub source: Option<String>,
    pub min_score: Option<f64>,
    pub skip: u64,
    pub limit: u64,
}

pub struct RatingRepository {
    conn: DatabaseConnection,
}

impl RatingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// One rating per (source, title); an existing row is left as is.
    pub async fn insert_if_absent(&self, new: &NewRating) -> StoreResult<bool> {
        let parent_col = match new.kind {
            TitleKind::Movie => ratings::Column::MovieId,
            TitleKind::Show => ratings::Column::ShowId,
        };

        let rows = Ratings::insert(new.active_model())
            .on_conflict(
                OnConflict::columns([ratings::Column::Source, parent_col])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(rows > 0)
    }

    pub async fn create(&self, new: &NewRating) -> StoreResult<ratings::Model> {
        Ok(new.active_model().insert(&self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> StoreResult<ratings::Model> {
        Ratings::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("rating", id))
    }

    pub async fn list(&self, filter: &RatingFilter) -> StoreResult<Vec<ratings::Model>> {
        let mut query = Ratings::find();

        if let Some(source) = &filter.source {
            query = query.filter(ratings::Column::Source.eq(source.as_str()));
        }
        if let Some(min_score) = filter.min_score {
            query = query.filter(ratings::Column::Score.gte(min_score));
        }

        Ok(query
            .order_by_asc(ratings::Column::Id)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn update(
        &self,
        id: i32,
        score: Option<f64>,
        votes: Option<i64>,
    ) -> StoreResult<ratings::Model> {
        let current = self.get(id).await?;
        let mut active: ratings::ActiveModel = current.clone().into();

        if let Some(score) = score {
            active.score = Set(score);
        }
        if let Some(votes) = votes {
            active.votes = Set(Some(votes));
        }

        if !active.is_changed() {
            return Ok(current);
        }

        Ok(active.update(&self.conn).await?)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(Ratings::find().count(&self.conn).await?)
    }
}
