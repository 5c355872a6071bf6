//! Polling station repository.

use std::sync::Arc;

use crate::entities::{PollingStation, polling_station};
use collate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Polling station repository for database operations.
#[derive(Clone)]
pub struct PollingStationRepository {
    db: Arc<DatabaseConnection>,
}

impl PollingStationRepository {
    /// Create a new polling station repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a polling station by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<polling_station::Model>> {
        PollingStation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a polling station by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<polling_station::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PollingStationNotFound(id.to_string()))
    }

    /// Find a polling station by its unique code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<polling_station::Model>> {
        PollingStation::find()
            .filter(polling_station::Column::Code.eq(code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List stations in a constituency, in code order.
    pub async fn list_by_constituency(
        &self,
        constituency_id: &str,
    ) -> AppResult<Vec<polling_station::Model>> {
        PollingStation::find()
            .filter(polling_station::Column::ConstituencyId.eq(constituency_id))
            .order_by_asc(polling_station::Column::Code)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of all stations belonging to any of the given constituencies.
    pub async fn ids_by_constituencies(
        &self,
        constituency_ids: &[String],
    ) -> AppResult<Vec<String>> {
        if constituency_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<(String,)> = PollingStation::find()
            .select_only()
            .column(polling_station::Column::Id)
            .filter(
                polling_station::Column::ConstituencyId
                    .is_in(constituency_ids.iter().map(String::as_str)),
            )
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Count all stations nationally.
    pub async fn count_all(&self) -> AppResult<u64> {
        PollingStation::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count stations in a constituency.
    pub async fn count_by_constituency(&self, constituency_id: &str) -> AppResult<u64> {
        PollingStation::find()
            .filter(polling_station::Column::ConstituencyId.eq(constituency_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count stations across a set of constituencies.
    pub async fn count_by_constituencies(&self, constituency_ids: &[String]) -> AppResult<u64> {
        if constituency_ids.is_empty() {
            return Ok(0);
        }
        PollingStation::find()
            .filter(
                polling_station::Column::ConstituencyId
                    .is_in(constituency_ids.iter().map(String::as_str)),
            )
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new polling station.
    pub async fn create(
        &self,
        model: polling_station::ActiveModel,
    ) -> AppResult<polling_station::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
