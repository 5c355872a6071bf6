//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use collate_common::AppError;
use collate_core::AuthClaims;

/// Authenticated user extractor.
///
/// Rejects with 401 when the auth middleware resolved no valid credential.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are set by the auth middleware
        parts
            .extensions
            .get::<AuthClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthClaims>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthClaims>().cloned()))
    }
}
