//! Authentication service.
//!
//! Issues and verifies HS256 bearer tokens and owns password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use collate_common::{AppError, AppResult, Config, IdGenerator};
use collate_db::{
    entities::{user, user::Role},
    repositories::UserRepository,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{ActiveEnum, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Authentication service for business logic.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_expiry: Duration,
    id_gen: IdGenerator,
}

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// User ID.
    pub sub: String,
    /// User email.
    pub email: String,
    /// User role.
    pub role: Role,
    /// Expiry, as a unix timestamp.
    pub exp: i64,
}

impl AuthClaims {
    /// Require one of the given roles, or fail with 403.
    pub fn require_role(&self, roles: &[Role]) -> AppResult<()> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        let allowed = roles
            .iter()
            .map(|r| r.to_value())
            .collect::<Vec<_>>()
            .join(", ");
        Err(AppError::Forbidden(format!("Requires one of [{allowed}]")))
    }

    /// Whether the claims carry the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Input for registering a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub role: Option<Role>,
}

/// Input for logging in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login/registration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub user: user::Model,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(user_repo: UserRepository, config: &Config) -> Self {
        Self {
            user_repo,
            jwt_secret: config.auth.jwt_secret.clone(),
            token_expiry: Duration::hours(config.auth.token_expiry_hours),
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user.
    pub async fn register(&self, input: RegisterInput) -> AppResult<TokenResponse> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        input.validate()?;
        validate_password_strength(&input.password)?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            name: Set(input.name),
            role: Set(input.role.unwrap_or_default()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        let token = self.issue_token(&user)?;

        Ok(TokenResponse { token, user })
    }

    /// Authenticate by email and password.
    pub async fn login(&self, input: LoginInput) -> AppResult<TokenResponse> {
        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        Ok(TokenResponse { token, user })
    }

    /// Issue a signed bearer token for a user.
    pub fn issue_token(&self, user: &user::Model) -> AppResult<String> {
        let claims = AuthClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + self.token_expiry).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a bearer token and return its claims.
    ///
    /// Missing, malformed, and expired tokens all map to 401.
    pub fn verify_token(&self, token: &str) -> AppResult<AuthClaims> {
        decode::<AuthClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
    }
}

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password strength rules for registration.
pub(crate) fn validate_password_strength(password: &str) -> AppResult<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use collate_common::config::{AuthConfig, BroadcastConfig, DatabaseConfig, ServerConfig};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_expiry_hours: 24,
            },
            broadcast: BroadcastConfig::default(),
        }
    }

    fn create_test_service() -> AuthService {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        AuthService::new(UserRepository::new(db), &create_test_config())
    }

    fn create_test_user(role: Role) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            email: "officer@example.com".to_string(),
            password_hash: hash_password("Str0ngpass").unwrap(),
            name: None,
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_verify_password_roundtrip() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Ab1").is_err());
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
        assert!(validate_password_strength("Str0ngpass").is_ok());
    }

    #[test]
    fn test_token_roundtrip() {
        let service = create_test_service();
        let user = create_test_user(Role::PollingOfficer);

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.email, "officer@example.com");
        assert_eq!(claims.role, Role::PollingOfficer);
    }

    #[test]
    fn test_verify_token_garbage() {
        let service = create_test_service();
        let result = service.verify_token("not.a.token");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let service = create_test_service();
        let user = create_test_user(Role::Viewer);
        let token = service.issue_token(&user).unwrap();

        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let mut config = create_test_config();
        config.auth.jwt_secret = "other-secret".to_string();
        let other = AuthService::new(UserRepository::new(db), &config);

        assert!(matches!(
            other.verify_token(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_require_role() {
        let claims = AuthClaims {
            sub: "u".to_string(),
            email: "e@example.com".to_string(),
            role: Role::Viewer,
            exp: 0,
        };

        assert!(claims.require_role(&[Role::Viewer]).is_ok());
        let err = claims
            .require_role(&[Role::PollingOfficer, Role::Admin])
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
