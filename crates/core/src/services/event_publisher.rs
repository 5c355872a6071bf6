//! Result event publisher.
//!
//! Provides an abstraction for announcing committed result mutations.
//! The actual implementation is provided by the api crate's broadcast
//! dispatcher; core services stay decoupled from the push machinery.

use async_trait::async_trait;
use collate_common::AppResult;
use collate_db::entities::{candidate::CandidateType, constituency::Region};
use std::sync::Arc;

/// A committed vote-record mutation, with enough context to recompute
/// only the scopes it touches.
#[derive(Debug, Clone)]
pub struct ResultChange {
    /// The affected vote record.
    pub result_id: String,
    /// Candidate the record belongs to.
    pub candidate_id: String,
    /// Whether the candidate runs presidentially or in a constituency.
    pub candidate_type: CandidateType,
    /// The candidate's constituency, for parliamentary candidates.
    pub constituency_id: Option<String>,
    /// Station the record was reported from.
    pub polling_station_id: String,
    /// Region of the station's constituency.
    pub region: Region,
}

/// Trait for publishing result-change events.
#[async_trait]
pub trait ResultEventPublisher: Send + Sync {
    /// Publish a result-change event.
    async fn publish_result_changed(&self, change: ResultChange) -> AppResult<()>;
}

/// A no-op implementation for tests or when push updates are disabled.
#[derive(Clone, Default)]
pub struct NoOpResultPublisher;

#[async_trait]
impl ResultEventPublisher for NoOpResultPublisher {
    async fn publish_result_changed(&self, _change: ResultChange) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed publisher trait object.
pub type ResultPublisherService = Arc<dyn ResultEventPublisher>;
