//! Vote record repository.
//!
//! Besides row CRUD this repository owns the two queries the aggregation
//! engine is built on: a scope-filtered `GROUP BY candidate_id, SUM(votes)`
//! and a distinct reporting-station select. Both read a consistent snapshot
//! in a single statement instead of issuing one query per candidate.

use std::sync::Arc;

use crate::entities::{VoteRecord, audit_log, vote_record};
use collate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect, SqlErr, TransactionTrait,
};

/// Summed votes for one candidate within a scope.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CandidateVoteTotal {
    /// Candidate the sum belongs to.
    pub candidate_id: String,
    /// `SUM(votes)`; `None` only when the driver reports an empty sum.
    pub total: Option<i64>,
}

/// Vote record repository for database operations.
#[derive(Clone)]
pub struct VoteRecordRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRecordRepository {
    /// Create a new vote record repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a record by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<vote_record::Model>> {
        VoteRecord::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a record by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<vote_record::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Result not found: {id}")))
    }

    /// Find the record for a (candidate, polling station) pair.
    pub async fn find_by_candidate_and_station(
        &self,
        candidate_id: &str,
        polling_station_id: &str,
    ) -> AppResult<Option<vote_record::Model>> {
        VoteRecord::find()
            .filter(vote_record::Column::CandidateId.eq(candidate_id))
            .filter(vote_record::Column::PollingStationId.eq(polling_station_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a record together with its audit entry in one transaction.
    ///
    /// Either both rows commit or neither does. A unique-constraint race on
    /// the (candidate, station) pair surfaces as [`AppError::Conflict`].
    pub async fn insert_with_audit(
        &self,
        record: vote_record::ActiveModel,
        audit: audit_log::ActiveModel,
    ) -> AppResult<vote_record::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = record.insert(&txn).await.map_err(map_write_err)?;
        audit
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(model)
    }

    /// Update a record together with its audit entry in one transaction.
    pub async fn update_with_audit(
        &self,
        record: vote_record::ActiveModel,
        audit: audit_log::ActiveModel,
    ) -> AppResult<vote_record::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = record.update(&txn).await.map_err(map_write_err)?;
        audit
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(model)
    }

    /// Sum votes per candidate in a single grouped query.
    ///
    /// `station_ids` narrows the scope to stations inside a constituency or
    /// region; `None` means national.
    pub async fn sum_votes_by_candidate(
        &self,
        candidate_ids: &[String],
        station_ids: Option<&[String]>,
    ) -> AppResult<Vec<CandidateVoteTotal>> {
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(stations) = station_ids
            && stations.is_empty()
        {
            return Ok(Vec::new());
        }

        let mut query = VoteRecord::find()
            .select_only()
            .column(vote_record::Column::CandidateId)
            .column_as(vote_record::Column::Votes.sum(), "total")
            .filter(vote_record::Column::CandidateId.is_in(candidate_ids.iter().map(String::as_str)))
            .group_by(vote_record::Column::CandidateId);

        if let Some(stations) = station_ids {
            query = query.filter(
                vote_record::Column::PollingStationId.is_in(stations.iter().map(String::as_str)),
            );
        }

        query
            .into_model::<CandidateVoteTotal>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Total votes across all records in scope.
    ///
    /// `station_ids` narrows the scope; `None` means national.
    pub async fn sum_votes(&self, station_ids: Option<&[String]>) -> AppResult<i64> {
        if let Some(stations) = station_ids
            && stations.is_empty()
        {
            return Ok(0);
        }

        let mut query = VoteRecord::find()
            .select_only()
            .column_as(vote_record::Column::Votes.sum(), "total");

        if let Some(stations) = station_ids {
            query = query.filter(
                vote_record::Column::PollingStationId.is_in(stations.iter().map(String::as_str)),
            );
        }

        let row: Option<(Option<i64>,)> = query
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.and_then(|(total,)| total).unwrap_or(0))
    }

    /// Distinct stations that have reported at least one record.
    ///
    /// `station_ids` narrows the scope; `None` means national.
    pub async fn reporting_station_count(
        &self,
        station_ids: Option<&[String]>,
    ) -> AppResult<u64> {
        if let Some(stations) = station_ids
            && stations.is_empty()
        {
            return Ok(0);
        }

        let mut query = VoteRecord::find()
            .select_only()
            .column(vote_record::Column::PollingStationId)
            .distinct();

        if let Some(stations) = station_ids {
            query = query.filter(
                vote_record::Column::PollingStationId.is_in(stations.iter().map(String::as_str)),
            );
        }

        let rows: Vec<(String,)> = query
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.len() as u64)
    }
}

/// Translate write-side database errors into the API taxonomy.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
            "A result for this candidate and polling station already exists".to_string(),
        ),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    #[tokio::test]
    async fn test_sum_votes_empty_candidate_set_short_circuits() {
        // No query should be issued at all; an empty mock would panic if one were.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = VoteRecordRepository::new(db);

        let totals = repo.sum_votes_by_candidate(&[], None).await.unwrap();
        assert!(totals.is_empty());
    }

    #[tokio::test]
    async fn test_sum_votes_empty_station_scope_short_circuits() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = VoteRecordRepository::new(db);

        let totals = repo
            .sum_votes_by_candidate(&["c1".to_string()], Some(&[]))
            .await
            .unwrap();
        assert!(totals.is_empty());

        let reporting = repo.reporting_station_count(Some(&[])).await.unwrap();
        assert_eq!(reporting, 0);
    }

    #[tokio::test]
    async fn test_sum_votes_parses_grouped_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    btreemap! {
                        "candidate_id" => Value::from("c1"),
                        "total" => Value::from(270i64),
                    },
                    btreemap! {
                        "candidate_id" => Value::from("c2"),
                        "total" => Value::from(150i64),
                    },
                ]])
                .into_connection(),
        );
        let repo = VoteRecordRepository::new(db);

        let totals = repo
            .sum_votes_by_candidate(&["c1".to_string(), "c2".to_string()], None)
            .await
            .unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].candidate_id, "c1");
        assert_eq!(totals[0].total, Some(270));
    }
}
