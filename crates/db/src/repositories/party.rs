//! Party repository.

use std::sync::Arc;

use crate::entities::{Party, party};
use collate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Party repository for database operations.
#[derive(Clone)]
pub struct PartyRepository {
    db: Arc<DatabaseConnection>,
}

impl PartyRepository {
    /// Create a new party repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a party by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<party::Model>> {
        Party::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a party by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<party::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Party not found: {id}")))
    }

    /// Find a party by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<party::Model>> {
        Party::find()
            .filter(party::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a party by abbreviation.
    pub async fn find_by_abbreviation(&self, abbreviation: &str) -> AppResult<Option<party::Model>> {
        Party::find()
            .filter(party::Column::Abbreviation.eq(abbreviation))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all parties in name order.
    pub async fn list(&self) -> AppResult<Vec<party::Model>> {
        Party::find()
            .order_by_asc(party::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find parties by a set of IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<party::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Party::find()
            .filter(party::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new party.
    pub async fn create(&self, model: party::ActiveModel) -> AppResult<party::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
