//! Constituency endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use collate_common::{AppError, AppResult};
use collate_core::CreateConstituencyInput;
use collate_db::entities::{constituency, constituency::Region, user::Role};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional region filter.
    pub region: Option<String>,
}

/// Create a constituency.
async fn create_constituency(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateConstituencyInput>,
) -> AppResult<(StatusCode, Json<constituency::Model>)> {
    claims.require_role(&[Role::Admin])?;
    let constituency = state.constituency_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(constituency)))
}

/// List constituencies, optionally filtered by region.
async fn list_constituencies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<constituency::Model>>> {
    let region = match query.region {
        Some(raw) => Some(
            raw.parse::<Region>()
                .map_err(|_| AppError::BadRequest("Invalid region".to_string()))?,
        ),
        None => None,
    };

    Ok(Json(state.constituency_service.list(region).await?))
}

/// Get a constituency by ID.
async fn get_constituency(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<constituency::Model>> {
    Ok(Json(state.constituency_service.get(&id).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_constituency).get(list_constituencies))
        .route("/{id}", get(get_constituency))
}
