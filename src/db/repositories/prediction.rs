use crate::db::StoreResult;
use crate::entities::{predictions, prelude::*};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct PredictionRepository {
    conn: DatabaseConnection,
}

impl PredictionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        user_id: &str,
        title_ref: Option<&str>,
        prediction_value: f64,
    ) -> StoreResult<predictions::Model> {
        let model = predictions::ActiveModel {
            user_id: Set(user_id.to_string()),
            title_ref: Set(title_ref.map(str::to_string)),
            prediction_value: Set(prediction_value),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    /// Newest first.
    pub async fn list(
        &self,
        user_id: Option<&str>,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<predictions::Model>> {
        let mut query = Predictions::find();
        if let Some(user_id) = user_id {
            query = query.filter(predictions::Column::UserId.eq(user_id));
        }

        Ok(query
            .order_by_desc(predictions::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(Predictions::find().count(&self.conn).await?)
    }
}
