use crate::db::{StoreError, StoreResult};
use crate::domain::normalize_key;
use crate::entities::{genres, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the genre for `name`, inserting it on first sight.
    /// The flag is `true` when this call created the row.
    pub async fn find_or_create(&self, name: &str) -> StoreResult<(genres::Model, bool)> {
        Self::find_or_create_in(&self.conn, name).await
    }

    pub async fn find_or_create_in<C: ConnectionTrait>(
        conn: &C,
        name: &str,
    ) -> StoreResult<(genres::Model, bool)> {
        let key = normalize_key(name);

        let inserted = Genres::insert(genres::ActiveModel {
            name: Set(name.trim().to_string()),
            normalized_name: Set(key.clone()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(genres::Column::NormalizedName)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

        let model = Genres::find()
            .filter(genres::Column::NormalizedName.eq(key.as_str()))
            .one(conn)
            .await?
            .ok_or_else(|| StoreError::not_found("genre", &key))?;

        Ok((model, inserted > 0))
    }

    pub async fn list(&self, skip: u64, limit: u64) -> StoreResult<Vec<genres::Model>> {
        Ok(Genres::find()
            .order_by_asc(genres::Column::Name)
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn get(&self, id: i32) -> StoreResult<genres::Model> {
        Genres::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("genre", id))
    }

    /// Fails with a constraint error when the normalized name is taken.
    pub async fn create(&self, name: &str) -> StoreResult<genres::Model> {
        let model = genres::ActiveModel {
            name: Set(name.trim().to_string()),
            normalized_name: Set(normalize_key(name)),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn rename(&self, id: i32, name: &str) -> StoreResult<genres::Model> {
        let mut active: genres::ActiveModel = self.get(id).await?.into();
        active.name = Set(name.trim().to_string());
        active.normalized_name = Set(normalize_key(name));
        Ok(active.update(&self.conn).await?)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(Genres::find().count(&self.conn).await?)
    }
}
