//! Constituency repository.

use std::sync::Arc;

use crate::entities::{Constituency, constituency, constituency::Region};
use collate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Constituency repository for database operations.
#[derive(Clone)]
pub struct ConstituencyRepository {
    db: Arc<DatabaseConnection>,
}

impl ConstituencyRepository {
    /// Create a new constituency repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a constituency by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<constituency::Model>> {
        Constituency::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a constituency by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<constituency::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Constituency not found: {id}")))
    }

    /// Find a constituency by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<constituency::Model>> {
        Constituency::find()
            .filter(constituency::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all constituencies in name order.
    pub async fn list(&self) -> AppResult<Vec<constituency::Model>> {
        Constituency::find()
            .order_by_asc(constituency::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List constituencies in a region, in name order.
    pub async fn list_by_region(&self, region: Region) -> AppResult<Vec<constituency::Model>> {
        Constituency::find()
            .filter(constituency::Column::Region.eq(region))
            .order_by_asc(constituency::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count constituencies in a region.
    pub async fn count_by_region(&self, region: Region) -> AppResult<u64> {
        Constituency::find()
            .filter(constituency::Column::Region.eq(region))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new constituency.
    pub async fn create(&self, model: constituency::ActiveModel) -> AppResult<constituency::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
