//! Candidate service.

use chrono::Utc;
use collate_common::{AppError, AppResult, IdGenerator};
use collate_db::{
    entities::{candidate, candidate::CandidateType},
    repositories::{CandidateRepository, ConstituencyRepository, PartyRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Candidate service for business logic.
#[derive(Clone)]
pub struct CandidateService {
    candidate_repo: CandidateRepository,
    party_repo: PartyRepository,
    constituency_repo: ConstituencyRepository,
    id_gen: IdGenerator,
}

/// Input for creating a candidate.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[serde(rename = "type")]
    pub candidate_type: CandidateType,

    #[validate(length(min = 1))]
    pub party_id: String,

    #[serde(default)]
    pub constituency_id: Option<String>,
}

impl CandidateService {
    /// Create a new candidate service.
    #[must_use]
    pub const fn new(
        candidate_repo: CandidateRepository,
        party_repo: PartyRepository,
        constituency_repo: ConstituencyRepository,
    ) -> Self {
        Self {
            candidate_repo,
            party_repo,
            constituency_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new candidate.
    ///
    /// Presidential candidates carry no constituency; parliamentary
    /// candidates require one.
    pub async fn create(&self, input: CreateCandidateInput) -> AppResult<candidate::Model> {
        input.validate()?;

        match (input.candidate_type, &input.constituency_id) {
            (CandidateType::Presidential, Some(_)) => {
                return Err(AppError::Validation(
                    "Presidential candidates cannot have a constituency".to_string(),
                ));
            }
            (CandidateType::Parliamentary, None) => {
                return Err(AppError::Validation(
                    "Parliamentary candidates require a constituency".to_string(),
                ));
            }
            _ => {}
        }

        let party = self.party_repo.get_by_id(&input.party_id).await?;

        let constituency_id = match &input.constituency_id {
            Some(id) => Some(self.constituency_repo.get_by_id(id).await?.id),
            None => None,
        };

        let model = candidate::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            candidate_type: Set(input.candidate_type),
            party_id: Set(party.id),
            constituency_id: Set(constituency_id),
            created_at: Set(Utc::now().into()),
        };

        self.candidate_repo.create(model).await
    }

    /// Get a candidate by ID.
    pub async fn get(&self, id: &str) -> AppResult<candidate::Model> {
        self.candidate_repo.get_by_id(id).await
    }

    /// List presidential candidates.
    pub async fn list_presidential(&self) -> AppResult<Vec<candidate::Model>> {
        self.candidate_repo.list_presidential().await
    }

    /// List parliamentary candidates for a constituency.
    pub async fn list_parliamentary(
        &self,
        constituency_id: &str,
    ) -> AppResult<Vec<candidate::Model>> {
        self.candidate_repo.list_parliamentary(constituency_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_service(db: sea_orm::DatabaseConnection) -> CandidateService {
        let db = Arc::new(db);
        CandidateService::new(
            CandidateRepository::new(Arc::clone(&db)),
            PartyRepository::new(Arc::clone(&db)),
            ConstituencyRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_presidential_with_constituency_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_test_service(db);

        let result = service
            .create(CreateCandidateInput {
                name: "Alice".to_string(),
                candidate_type: CandidateType::Presidential,
                party_id: "party1".to_string(),
                constituency_id: Some("const1".to_string()),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_parliamentary_without_constituency_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_test_service(db);

        let result = service
            .create(CreateCandidateInput {
                name: "Bob".to_string(),
                candidate_type: CandidateType::Parliamentary,
                party_id: "party1".to_string(),
                constituency_id: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
