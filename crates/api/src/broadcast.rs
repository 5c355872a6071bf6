//! Broadcast dispatcher.
//!
//! Listens for committed result mutations, recomputes only the scopes each
//! mutation touches, and fans the fresh snapshots out to subscribed push
//! connections. Also runs a periodic presidential sweep so clients that
//! missed an event converge within one interval.
//!
//! The dispatcher is an explicitly constructed instance with a
//! `start()`/`stop()` lifecycle; it is injected into the result service as
//! its event publisher and into the server bootstrap. No global state.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use collate_common::{AppError, AppResult};
use collate_core::{
    AggregationService, ResultChange, ResultEventPublisher,
};
use collate_db::entities::candidate::CandidateType;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::registry::{ScopeKey, SubscriptionRegistry};
use crate::streaming::ServerMessage;

/// Dispatches aggregation snapshots to push subscribers.
pub struct BroadcastDispatcher {
    aggregation: AggregationService,
    registry: SubscriptionRegistry,
    sweep_interval: Duration,
    events_tx: mpsc::UnboundedSender<ResultChange>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<ResultChange>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl BroadcastDispatcher {
    /// Create a new dispatcher. Call [`start`](Self::start) to begin
    /// processing events.
    #[must_use]
    pub fn new(
        aggregation: AggregationService,
        registry: SubscriptionRegistry,
        sweep_interval: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            aggregation,
            registry,
            sweep_interval,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the event loop and the periodic sweep.
    ///
    /// Calling `start` twice is a no-op: the event receiver has already
    /// been claimed by the first call.
    pub fn start(&self) {
        let Some(mut events_rx) = self.take_events_rx() else {
            warn!("Broadcast dispatcher already started");
            return;
        };

        let aggregation = self.aggregation.clone();
        let registry = self.registry.clone();
        let event_task = tokio::spawn(async move {
            while let Some(change) = events_rx.recv().await {
                on_result_changed(&aggregation, &registry, change).await;
            }
            debug!("Broadcast event loop finished");
        });

        let aggregation = self.aggregation.clone();
        let registry = self.registry.clone();
        let sweep_interval = self.sweep_interval;
        let sweep_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            // The first tick fires immediately; skip it so a fresh boot
            // does not push before anyone can have subscribed.
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = push_presidential(&aggregation, &registry).await {
                    warn!(error = %e, "Periodic presidential sweep failed");
                }
            }
        });

        let mut tasks = self.lock_tasks();
        tasks.push(event_task);
        tasks.push(sweep_task);

        info!(
            sweep_interval_secs = self.sweep_interval.as_secs(),
            "Broadcast dispatcher started"
        );
    }

    /// Stop the event loop and the periodic sweep.
    pub fn stop(&self) {
        for task in self.lock_tasks().drain(..) {
            task.abort();
        }
        info!("Broadcast dispatcher stopped");
    }

    fn take_events_rx(&self) -> Option<mpsc::UnboundedReceiver<ResultChange>> {
        self.events_rx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for BroadcastDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[async_trait]
impl ResultEventPublisher for BroadcastDispatcher {
    async fn publish_result_changed(&self, change: ResultChange) -> AppResult<()> {
        self.events_tx
            .send(change)
            .map_err(|_| AppError::Internal("Broadcast dispatcher is not running".to_string()))
    }
}

/// Recompute and push every scope a mutation touches.
///
/// A failure on one scope is logged and does not abort the others.
async fn on_result_changed(
    aggregation: &AggregationService,
    registry: &SubscriptionRegistry,
    change: ResultChange,
) {
    debug!(result_id = %change.result_id, "Dispatching result change");

    if change.candidate_type == CandidateType::Presidential
        && let Err(e) = push_presidential(aggregation, registry).await
    {
        warn!(error = %e, "Failed to push presidential update");
    }

    if let Some(constituency_id) = &change.constituency_id
        && let Err(e) = push_constituency(aggregation, registry, constituency_id).await
    {
        warn!(constituency_id = %constituency_id, error = %e, "Failed to push constituency update");
    }

    if let Err(e) = push_region(aggregation, registry, &change).await {
        warn!(region = %change.region, error = %e, "Failed to push region update");
    }
}

/// Push the presidential snapshot to its subscribers.
async fn push_presidential(
    aggregation: &AggregationService,
    registry: &SubscriptionRegistry,
) -> AppResult<()> {
    let scope = ScopeKey::Presidential;
    if registry.member_count(&scope) == 0 {
        return Ok(());
    }

    let snapshot = aggregation.presidential().await?;
    let delivered = registry.publish(&scope, &ServerMessage::PresidentialUpdate(snapshot));
    debug!(delivered, "Pushed presidential update");
    Ok(())
}

/// Push one constituency's snapshot to its subscribers.
async fn push_constituency(
    aggregation: &AggregationService,
    registry: &SubscriptionRegistry,
    constituency_id: &str,
) -> AppResult<()> {
    let scope = ScopeKey::Constituency(constituency_id.to_string());
    if registry.member_count(&scope) == 0 {
        return Ok(());
    }

    let snapshot = aggregation.constituency(constituency_id).await?;
    let delivered = registry.publish(&scope, &ServerMessage::ConstituencyUpdate(Box::new(snapshot)));
    debug!(constituency_id, delivered, "Pushed constituency update");
    Ok(())
}

/// Push one region's snapshot to its subscribers.
async fn push_region(
    aggregation: &AggregationService,
    registry: &SubscriptionRegistry,
    change: &ResultChange,
) -> AppResult<()> {
    let scope = ScopeKey::Region(change.region);
    if registry.member_count(&scope) == 0 {
        return Ok(());
    }

    let snapshot = aggregation.region(change.region).await?;
    let delivered = registry.publish(&scope, &ServerMessage::RegionUpdate(snapshot));
    debug!(region = %change.region, delivered, "Pushed region update");
    Ok(())
}
