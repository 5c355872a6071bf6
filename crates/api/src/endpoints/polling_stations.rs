//! Polling station endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use collate_common::AppResult;
use collate_core::CreatePollingStationInput;
use collate_db::entities::{polling_station, user::Role};

use crate::{extractors::AuthUser, middleware::AppState};

/// Create a polling station.
async fn create_polling_station(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePollingStationInput>,
) -> AppResult<(StatusCode, Json<polling_station::Model>)> {
    claims.require_role(&[Role::Admin])?;
    let station = state.polling_station_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(station)))
}

/// List stations in a constituency.
async fn list_polling_stations(
    State(state): State<AppState>,
    Path(constituency_id): Path<String>,
) -> AppResult<Json<Vec<polling_station::Model>>> {
    Ok(Json(
        state
            .polling_station_service
            .list_by_constituency(&constituency_id)
            .await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_polling_station))
        .route("/{constituency_id}", get(list_polling_stations))
}
