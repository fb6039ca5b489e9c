use super::like_contains;
use crate::db::{StoreError, StoreResult};
use crate::domain::normalize_key;
use crate::entities::{people, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct PersonRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Clone, Default)]
pub struct PersonChanges {
    pub name: Option<String>,
    pub external_id: Option<String>,
}

impl PersonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// People are keyed by normalized name; the first external id seen is kept.
    pub async fn find_or_create(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> StoreResult<(people::Model, bool)> {
        let key = normalize_key(name);

        let inserted = People::insert(people::ActiveModel {
            name: Set(name.trim().to_string()),
            normalized_name: Set(key.clone()),
            external_id: Set(external_id.map(str::to_string)),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(people::Column::NormalizedName)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        let model = People::find()
            .filter(people::Column::NormalizedName.eq(key.as_str()))
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("person", &key))?;

        Ok((model, inserted > 0))
    }

    pub async fn list(
        &self,
        name: Option<&str>,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<people::Model>> {
        let mut query = People::find();
        if let Some(name) = name {
            query = query.filter(people::Column::Name.like(like_contains(name)));
        }

        Ok(query
            .order_by_asc(people::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn get(&self, id: i32) -> StoreResult<people::Model> {
        People::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("person", id))
    }

    pub async fn create(&self, name: &str, external_id: Option<&str>) -> StoreResult<people::Model> {
        let model = people::ActiveModel {
            name: Set(name.trim().to_string()),
            normalized_name: Set(normalize_key(name)),
            external_id: Set(external_id.map(str::to_string)),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn update(&self, id: i32, changes: &PersonChanges) -> StoreResult<people::Model> {
        let current = self.get(id).await?;
        let mut active: people::ActiveModel = current.clone().into();

        if let Some(name) = &changes.name {
            active.name = Set(name.trim().to_string());
            active.normalized_name = Set(normalize_key(name));
        }
        if let Some(external_id) = &changes.external_id {
            active.external_id = Set(Some(external_id.clone()));
        }

        if !active.is_changed() {
            return Ok(current);
        }

        Ok(active.update(&self.conn).await?)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(People::find().count(&self.conn).await?)
    }
}
