//! API endpoints.

mod auth;
mod candidates;
mod constituencies;
mod parties;
mod polling_stations;
mod regions;
mod results;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/parties", parties::router())
        .nest("/constituencies", constituencies::router())
        .nest("/polling-stations", polling_stations::router())
        .nest("/candidates", candidates::router())
        .nest("/results", results::router())
        .nest("/regions", regions::router())
}
