//! Candidate endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use collate_common::AppResult;
use collate_core::CreateCandidateInput;
use collate_db::entities::{candidate, user::Role};

use crate::{extractors::AuthUser, middleware::AppState};

/// Create a candidate.
async fn create_candidate(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCandidateInput>,
) -> AppResult<(StatusCode, Json<candidate::Model>)> {
    claims.require_role(&[Role::Admin])?;
    let candidate = state.candidate_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// List presidential candidates.
async fn list_presidential(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<candidate::Model>>> {
    Ok(Json(state.candidate_service.list_presidential().await?))
}

/// List parliamentary candidates for a constituency.
async fn list_parliamentary(
    State(state): State<AppState>,
    Path(constituency_id): Path<String>,
) -> AppResult<Json<Vec<candidate::Model>>> {
    Ok(Json(
        state
            .candidate_service
            .list_parliamentary(&constituency_id)
            .await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_candidate))
        .route("/presidential", get(list_presidential))
        .route("/parliamentary/{constituency_id}", get(list_parliamentary))
}
