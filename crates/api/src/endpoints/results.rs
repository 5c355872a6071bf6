//! Result endpoints.
//!
//! Submission and correction are role-guarded; the aggregation reads are
//! public and serve the exact payloads the push channel broadcasts.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use collate_common::{AppError, AppResult};
use collate_core::{
    ConstituencyResults, PresidentialResults, RegionResults, SubmitResultInput, UpdateResultInput,
};
use collate_db::entities::{constituency::Region, user::Role, vote_record};

use crate::{extractors::AuthUser, middleware::AppState};

/// Submit a result for a (candidate, polling station) pair.
async fn submit_result(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitResultInput>,
) -> AppResult<(StatusCode, Json<vote_record::Model>)> {
    claims.require_role(&[Role::PollingOfficer])?;

    let record = state.result_service.submit(input, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update an existing result's vote count.
async fn update_result(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateResultInput>,
) -> AppResult<Json<vote_record::Model>> {
    claims.require_role(&[Role::PollingOfficer, Role::Admin])?;

    let record = state
        .result_service
        .update(&id, input, &claims.sub, claims.role)
        .await?;
    Ok(Json(record))
}

/// Aggregated presidential results.
async fn presidential_results(
    State(state): State<AppState>,
) -> AppResult<Json<PresidentialResults>> {
    Ok(Json(state.aggregation_service.presidential().await?))
}

/// Aggregated parliamentary results for a constituency.
async fn parliamentary_results(
    State(state): State<AppState>,
    Path(constituency_id): Path<String>,
) -> AppResult<Json<ConstituencyResults>> {
    Ok(Json(
        state.aggregation_service.constituency(&constituency_id).await?,
    ))
}

/// Combined presidential + parliamentary rollup for a region.
async fn region_results(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> AppResult<Json<RegionResults>> {
    let region: Region = region
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid or missing region".to_string()))?;

    Ok(Json(state.aggregation_service.region(region).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_result))
        .route("/{id}", put(update_result))
        .route("/presidential", get(presidential_results))
        .route("/parliamentary/{constituency_id}", get(parliamentary_results))
        .route("/region/{region}", get(region_results))
}
