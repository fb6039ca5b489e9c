use crate::db::{StoreError, StoreResult};
use crate::domain::normalize_key;
use crate::entities::{characters, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

pub struct CharacterRepository {
    conn: DatabaseConnection,
}

impl CharacterRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_or_create(&self, name: &str) -> StoreResult<(characters::Model, bool)> {
        let key = normalize_key(name);

        let inserted = Characters::insert(characters::ActiveModel {
            name: Set(name.trim().to_string()),
            normalized_name: Set(key.clone()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(characters::Column::NormalizedName)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        let model = Characters::find()
            .filter(characters::Column::NormalizedName.eq(key.as_str()))
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("character", &key))?;

        Ok((model, inserted > 0))
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(Characters::find().count(&self.conn).await?)
    }
}
