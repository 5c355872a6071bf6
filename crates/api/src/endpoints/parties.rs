//! Party endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use collate_common::AppResult;
use collate_core::CreatePartyInput;
use collate_db::entities::{party, user::Role};

use crate::{extractors::AuthUser, middleware::AppState};

/// Create a party.
async fn create_party(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePartyInput>,
) -> AppResult<(StatusCode, Json<party::Model>)> {
    claims.require_role(&[Role::Admin])?;
    let party = state.party_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(party)))
}

/// List all parties.
async fn list_parties(State(state): State<AppState>) -> AppResult<Json<Vec<party::Model>>> {
    Ok(Json(state.party_service.list().await?))
}

/// Get a party by ID.
async fn get_party(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<party::Model>> {
    Ok(Json(state.party_service.get(&id).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_party).get(list_parties))
        .route("/{id}", get(get_party))
}
