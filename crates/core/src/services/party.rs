//! Party service.

use chrono::Utc;
use collate_common::{AppError, AppResult, IdGenerator};
use collate_db::{entities::party, repositories::PartyRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Party service for business logic.
#[derive(Clone)]
pub struct PartyService {
    party_repo: PartyRepository,
    id_gen: IdGenerator,
}

/// Input for creating a party.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 1, max = 32))]
    pub abbreviation: String,

    #[validate(length(min = 1, max = 32))]
    pub color: String,

    #[serde(default)]
    pub logo_url: Option<String>,
}

impl PartyService {
    /// Create a new party service.
    #[must_use]
    pub const fn new(party_repo: PartyRepository) -> Self {
        Self {
            party_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new party.
    pub async fn create(&self, input: CreatePartyInput) -> AppResult<party::Model> {
        input.validate()?;

        if self.party_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict("Party already exists".to_string()));
        }
        if self
            .party_repo
            .find_by_abbreviation(&input.abbreviation)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Party abbreviation already in use".to_string(),
            ));
        }

        let model = party::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            abbreviation: Set(input.abbreviation),
            color: Set(input.color),
            logo_url: Set(input.logo_url),
            created_at: Set(Utc::now().into()),
        };

        self.party_repo.create(model).await
    }

    /// Get a party by ID.
    pub async fn get(&self, id: &str) -> AppResult<party::Model> {
        self.party_repo.get_by_id(id).await
    }

    /// List all parties.
    pub async fn list(&self) -> AppResult<Vec<party::Model>> {
        self.party_repo.list().await
    }
}
