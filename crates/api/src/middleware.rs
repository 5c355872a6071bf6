//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use collate_core::{
    AggregationService, AuthService, CandidateService, ConstituencyService, PartyService,
    PollingStationService, RegionService, ResultService, UserService,
};

use crate::registry::SubscriptionRegistry;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub party_service: PartyService,
    pub constituency_service: ConstituencyService,
    pub polling_station_service: PollingStationService,
    pub candidate_service: CandidateService,
    pub result_service: ResultService,
    pub aggregation_service: AggregationService,
    pub region_service: RegionService,
    pub registry: SubscriptionRegistry,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token into [`AuthClaims`](collate_core::AuthClaims)
/// request extensions. Requests without a valid token pass through
/// unauthenticated; protected handlers reject them via the extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = state.auth_service.verify_token(token)
    {
        req.extensions_mut().insert(claims);
    }

    next.run(req).await
}
