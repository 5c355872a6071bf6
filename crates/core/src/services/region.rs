//! Region overview service.
//!
//! Read-only stats for the region dashboards; the scoped vote aggregation
//! itself lives in [`AggregationService`](crate::services::AggregationService).

use collate_common::AppResult;
use collate_db::{
    entities::{constituency, constituency::Region},
    repositories::{ConstituencyRepository, PollingStationRepository, VoteRecordRepository},
};
use serde::Serialize;

/// Region service for business logic.
#[derive(Clone)]
pub struct RegionService {
    constituency_repo: ConstituencyRepository,
    station_repo: PollingStationRepository,
    vote_record_repo: VoteRecordRepository,
}

/// Summary stats for one region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionOverview {
    pub name: Region,
    pub constituencies: u64,
    pub polling_stations: u64,
    pub total_votes: i64,
}

/// Details for a single region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetail {
    pub name: Region,
    pub constituencies: Vec<constituency::Model>,
    pub total_constituencies: usize,
}

impl RegionService {
    /// Create a new region service.
    #[must_use]
    pub const fn new(
        constituency_repo: ConstituencyRepository,
        station_repo: PollingStationRepository,
        vote_record_repo: VoteRecordRepository,
    ) -> Self {
        Self {
            constituency_repo,
            station_repo,
            vote_record_repo,
        }
    }

    /// Stats for every region.
    pub async fn overview(&self) -> AppResult<Vec<RegionOverview>> {
        let mut overviews = Vec::new();

        for region in Region::all() {
            let constituencies = self.constituency_repo.list_by_region(region).await?;
            let constituency_ids: Vec<String> =
                constituencies.iter().map(|c| c.id.clone()).collect();

            let station_ids = self
                .station_repo
                .ids_by_constituencies(&constituency_ids)
                .await?;
            let total_votes = self.vote_record_repo.sum_votes(Some(&station_ids)).await?;

            overviews.push(RegionOverview {
                name: region,
                constituencies: constituencies.len() as u64,
                polling_stations: station_ids.len() as u64,
                total_votes,
            });
        }

        Ok(overviews)
    }

    /// Constituency listing for one region.
    pub async fn detail(&self, region: Region) -> AppResult<RegionDetail> {
        let constituencies = self.constituency_repo.list_by_region(region).await?;
        let total_constituencies = constituencies.len();

        Ok(RegionDetail {
            name: region,
            constituencies,
            total_constituencies,
        })
    }
}
