//! Candidate repository.

use std::sync::Arc;

use crate::entities::{Candidate, candidate, candidate::CandidateType};
use collate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Candidate repository for database operations.
#[derive(Clone)]
pub struct CandidateRepository {
    db: Arc<DatabaseConnection>,
}

impl CandidateRepository {
    /// Create a new candidate repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a candidate by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<candidate::Model>> {
        Candidate::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a candidate by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<candidate::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CandidateNotFound(id.to_string()))
    }

    /// All presidential candidates, in stable ID order.
    ///
    /// The aggregator relies on this ordering for deterministic tie-breaks.
    pub async fn list_presidential(&self) -> AppResult<Vec<candidate::Model>> {
        Candidate::find()
            .filter(candidate::Column::CandidateType.eq(CandidateType::Presidential))
            .order_by_asc(candidate::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Parliamentary candidates tied to a constituency, in stable ID order.
    pub async fn list_parliamentary(
        &self,
        constituency_id: &str,
    ) -> AppResult<Vec<candidate::Model>> {
        Candidate::find()
            .filter(candidate::Column::CandidateType.eq(CandidateType::Parliamentary))
            .filter(candidate::Column::ConstituencyId.eq(constituency_id))
            .order_by_asc(candidate::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new candidate.
    pub async fn create(&self, model: candidate::ActiveModel) -> AppResult<candidate::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
