//! Result mutation service.
//!
//! The only write path into the vote record store. Validates in a fixed
//! order, writes record + audit entry atomically, then announces the
//! committed change to the broadcast dispatcher.

use chrono::Utc;
use collate_common::{AppError, AppResult, IdGenerator};
use collate_db::{
    entities::{audit_log, user::Role, vote_record},
    repositories::{
        CandidateRepository, ConstituencyRepository, PollingStationRepository,
        VoteRecordRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::warn;

use crate::services::event_publisher::{ResultChange, ResultPublisherService};

/// Result service for business logic.
#[derive(Clone)]
pub struct ResultService {
    vote_record_repo: VoteRecordRepository,
    candidate_repo: CandidateRepository,
    station_repo: PollingStationRepository,
    constituency_repo: ConstituencyRepository,
    publisher: ResultPublisherService,
    id_gen: IdGenerator,
}

/// Input for submitting a result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultInput {
    pub candidate_id: String,
    pub polling_station_id: String,
    pub votes: i32,
}

/// Input for updating a result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResultInput {
    pub votes: i32,
}

impl ResultService {
    /// Create a new result service.
    #[must_use]
    pub fn new(
        vote_record_repo: VoteRecordRepository,
        candidate_repo: CandidateRepository,
        station_repo: PollingStationRepository,
        constituency_repo: ConstituencyRepository,
        publisher: ResultPublisherService,
    ) -> Self {
        Self {
            vote_record_repo,
            candidate_repo,
            station_repo,
            constituency_repo,
            publisher,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new result for a (candidate, polling station) pair.
    ///
    /// Validation order: required fields, non-negative votes, candidate
    /// exists, station exists, no existing record for the pair. Each check
    /// short-circuits; nothing is written on failure.
    pub async fn submit(
        &self,
        input: SubmitResultInput,
        submitter_id: &str,
    ) -> AppResult<vote_record::Model> {
        if input.candidate_id.is_empty() || input.polling_station_id.is_empty() {
            return Err(AppError::Validation(
                "candidateId, pollingStationId, and votes are required".to_string(),
            ));
        }
        if input.votes < 0 {
            return Err(AppError::Validation(
                "votes must be non-negative".to_string(),
            ));
        }

        let candidate = self.candidate_repo.get_by_id(&input.candidate_id).await?;
        let station = self.station_repo.get_by_id(&input.polling_station_id).await?;

        if self
            .vote_record_repo
            .find_by_candidate_and_station(&candidate.id, &station.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A result for this candidate and polling station already exists".to_string(),
            ));
        }

        // Resolved before the write so the event carries the affected scopes.
        let constituency = self.constituency_repo.get_by_id(&station.constituency_id).await?;

        let model = vote_record::ActiveModel {
            id: Set(self.id_gen.generate()),
            candidate_id: Set(candidate.id.clone()),
            polling_station_id: Set(station.id.clone()),
            votes: Set(input.votes),
            submitted_by: Set(submitter_id.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let audit = self.audit_entry("RESULT_CREATE", &model, None, submitter_id);

        let record = self.vote_record_repo.insert_with_audit(model, audit).await?;

        self.announce(ResultChange {
            result_id: record.id.clone(),
            candidate_id: candidate.id.clone(),
            candidate_type: candidate.candidate_type,
            constituency_id: candidate.constituency_id.clone(),
            polling_station_id: station.id.clone(),
            region: constituency.region,
        })
        .await;

        Ok(record)
    }

    /// Update an existing result's vote count.
    ///
    /// Only the original submitter or an admin may update a record.
    pub async fn update(
        &self,
        result_id: &str,
        input: UpdateResultInput,
        requester_id: &str,
        requester_role: Role,
    ) -> AppResult<vote_record::Model> {
        if input.votes < 0 {
            return Err(AppError::Validation(
                "votes must be non-negative".to_string(),
            ));
        }

        let existing = self.vote_record_repo.get_by_id(result_id).await?;

        if existing.submitted_by != requester_id && requester_role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only the original submitter or an admin may update a result".to_string(),
            ));
        }

        let candidate = self.candidate_repo.get_by_id(&existing.candidate_id).await?;
        let station = self.station_repo.get_by_id(&existing.polling_station_id).await?;
        let constituency = self.constituency_repo.get_by_id(&station.constituency_id).await?;

        let old_value = serde_json::to_value(&existing)
            .map_err(|e| AppError::Internal(format!("Failed to serialize record: {e}")))?;

        let mut active: vote_record::ActiveModel = existing.into();
        active.votes = Set(input.votes);
        active.updated_at = Set(Some(Utc::now().into()));

        let audit = self.audit_entry("RESULT_UPDATE", &active, Some(old_value), requester_id);

        let record = self.vote_record_repo.update_with_audit(active, audit).await?;

        self.announce(ResultChange {
            result_id: record.id.clone(),
            candidate_id: candidate.id.clone(),
            candidate_type: candidate.candidate_type,
            constituency_id: candidate.constituency_id.clone(),
            polling_station_id: station.id.clone(),
            region: constituency.region,
        })
        .await;

        Ok(record)
    }

    /// Build the audit entry committed alongside a write.
    fn audit_entry(
        &self,
        action: &str,
        record: &vote_record::ActiveModel,
        old_value: Option<serde_json::Value>,
        actor_id: &str,
    ) -> audit_log::ActiveModel {
        let new_value = serde_json::json!({
            "candidateId": record.candidate_id.as_ref(),
            "pollingStationId": record.polling_station_id.as_ref(),
            "votes": record.votes.as_ref(),
        });

        audit_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            action: Set(action.to_string()),
            entity: Set("VoteRecord".to_string()),
            entity_id: Set(record.id.as_ref().clone()),
            old_value: Set(old_value),
            new_value: Set(Some(new_value)),
            actor_id: Set(actor_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
    }

    /// Publish a change event; the write is already committed, so a publish
    /// failure is logged rather than returned.
    async fn announce(&self, change: ResultChange) {
        let result_id = change.result_id.clone();
        if let Err(e) = self.publisher.publish_result_changed(change).await {
            warn!(result_id = %result_id, error = %e, "Failed to publish result change");
        }
    }
}
