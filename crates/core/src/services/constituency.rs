//! Constituency service.

use chrono::Utc;
use collate_common::{AppError, AppResult, IdGenerator};
use collate_db::{
    entities::{constituency, constituency::Region},
    repositories::ConstituencyRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Constituency service for business logic.
#[derive(Clone)]
pub struct ConstituencyService {
    constituency_repo: ConstituencyRepository,
    id_gen: IdGenerator,
}

/// Input for creating a constituency.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConstituencyInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    pub region: Region,
}

impl ConstituencyService {
    /// Create a new constituency service.
    #[must_use]
    pub const fn new(constituency_repo: ConstituencyRepository) -> Self {
        Self {
            constituency_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new constituency.
    pub async fn create(&self, input: CreateConstituencyInput) -> AppResult<constituency::Model> {
        input.validate()?;

        if self
            .constituency_repo
            .find_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Constituency already exists".to_string()));
        }

        let model = constituency::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            region: Set(input.region),
            created_at: Set(Utc::now().into()),
        };

        self.constituency_repo.create(model).await
    }

    /// Get a constituency by ID.
    pub async fn get(&self, id: &str) -> AppResult<constituency::Model> {
        self.constituency_repo.get_by_id(id).await
    }

    /// List all constituencies, optionally filtered by region.
    pub async fn list(&self, region: Option<Region>) -> AppResult<Vec<constituency::Model>> {
        match region {
            Some(region) => self.constituency_repo.list_by_region(region).await,
            None => self.constituency_repo.list().await,
        }
    }
}
