use crate::db::{StoreError, StoreResult};
use crate::domain::normalize_key;
use crate::entities::{countries, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

pub struct CountryRepository {
    conn: DatabaseConnection,
}

impl CountryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_or_create(&self, code: &str) -> StoreResult<(countries::Model, bool)> {
        let key = normalize_key(code);

        let inserted = Countries::insert(countries::ActiveModel {
            code: Set(code.trim().to_string()),
            normalized_code: Set(key.clone()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(countries::Column::NormalizedCode)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        let model = Countries::find()
            .filter(countries::Column::NormalizedCode.eq(key.as_str()))
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("country", &key))?;

        Ok((model, inserted > 0))
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(Countries::find().count(&self.conn).await?)
    }
}
