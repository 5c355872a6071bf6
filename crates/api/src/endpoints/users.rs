//! User administration endpoints. Admin only.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};
use collate_common::AppResult;
use collate_core::{CreateUserInput, UpdateUserInput};
use collate_db::entities::{user, user::Role};

use crate::{extractors::AuthUser, middleware::AppState};

/// Create a user.
async fn create_user(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<user::Model>)> {
    claims.require_role(&[Role::Admin])?;
    let user = state.user_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users.
async fn list_users(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<user::Model>>> {
    claims.require_role(&[Role::Admin])?;
    Ok(Json(state.user_service.list().await?))
}

/// Update a user.
async fn update_user(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<user::Model>> {
    claims.require_role(&[Role::Admin])?;
    Ok(Json(state.user_service.update(&id, input).await?))
}

/// Delete a user.
async fn delete_user(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_role(&[Role::Admin])?;
    state.user_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/{id}", put(update_user).delete(delete_user))
}
