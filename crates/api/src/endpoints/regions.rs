//! Region endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use collate_common::{AppError, AppResult};
use collate_core::{RegionDetail, RegionOverview};
use collate_db::entities::constituency::Region;

use crate::middleware::AppState;

/// Stats for all regions.
async fn list_regions(State(state): State<AppState>) -> AppResult<Json<Vec<RegionOverview>>> {
    Ok(Json(state.region_service.overview().await?))
}

/// Details for one region.
async fn get_region(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<RegionDetail>> {
    let region: Region = name
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid region".to_string()))?;

    Ok(Json(state.region_service.detail(region).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_regions))
        .route("/{name}", get(get_region))
}
