//! Polling station service.

use chrono::Utc;
use collate_common::{AppError, AppResult, IdGenerator};
use collate_db::{
    entities::polling_station,
    repositories::{ConstituencyRepository, PollingStationRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Polling station service for business logic.
#[derive(Clone)]
pub struct PollingStationService {
    station_repo: PollingStationRepository,
    constituency_repo: ConstituencyRepository,
    id_gen: IdGenerator,
}

/// Input for creating a polling station.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollingStationInput {
    #[validate(length(min = 1, max = 64))]
    pub code: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[serde(default)]
    pub location: Option<String>,

    #[validate(length(min = 1))]
    pub constituency_id: String,
}

impl PollingStationService {
    /// Create a new polling station service.
    #[must_use]
    pub const fn new(
        station_repo: PollingStationRepository,
        constituency_repo: ConstituencyRepository,
    ) -> Self {
        Self {
            station_repo,
            constituency_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new polling station.
    pub async fn create(
        &self,
        input: CreatePollingStationInput,
    ) -> AppResult<polling_station::Model> {
        input.validate()?;

        if self.station_repo.find_by_code(&input.code).await?.is_some() {
            return Err(AppError::Conflict(
                "Polling station code already exists".to_string(),
            ));
        }

        // Dangling constituency reference fails before the write.
        let constituency = self.constituency_repo.get_by_id(&input.constituency_id).await?;

        let model = polling_station::ActiveModel {
            id: Set(self.id_gen.generate()),
            code: Set(input.code),
            name: Set(input.name),
            location: Set(input.location),
            constituency_id: Set(constituency.id),
            created_at: Set(Utc::now().into()),
        };

        self.station_repo.create(model).await
    }

    /// Get a polling station by ID.
    pub async fn get(&self, id: &str) -> AppResult<polling_station::Model> {
        self.station_repo.get_by_id(id).await
    }

    /// List stations in a constituency.
    pub async fn list_by_constituency(
        &self,
        constituency_id: &str,
    ) -> AppResult<Vec<polling_station::Model>> {
        self.station_repo.list_by_constituency(constituency_id).await
    }
}
