//! Authentication endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use collate_common::{AppError, AppResult};
use collate_core::{LoginInput, RegisterInput, TokenResponse};
use collate_db::entities::user::Role;

use crate::{extractors::MaybeAuthUser, middleware::AppState};

/// Register a new account.
///
/// Anyone may register a viewer; creating privileged accounts requires an
/// admin credential.
async fn register(
    MaybeAuthUser(maybe_claims): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    if !matches!(input.role, None | Some(Role::Viewer))
        && !maybe_claims.is_some_and(|claims| claims.is_admin())
    {
        return Err(AppError::Forbidden(
            "Only admins may create privileged accounts".to_string(),
        ));
    }

    let response = state.auth_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange email and password for a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<TokenResponse>> {
    Ok(Json(state.auth_service.login(input).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
