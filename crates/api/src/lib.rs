//! HTTP API layer for collate-rs.
//!
//! This crate provides the REST API and real-time streaming:
//!
//! - **Endpoints**: results submission and aggregation reads, plus
//!   reference-data CRUD
//! - **Extractors**: bearer-token authentication
//! - **Registry**: scope-keyed subscription groups for push clients
//! - **Broadcast**: the dispatcher that recomputes and fans out snapshots
//! - **Streaming**: the WebSocket push channel
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod broadcast;
pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod registry;
pub mod streaming;

pub use broadcast::BroadcastDispatcher;
pub use endpoints::router;
pub use registry::{ScopeKey, SubscriptionRegistry};
pub use streaming::streaming_handler;
