//! User administration service.
//!
//! Admin-only CRUD over user accounts; token issuance lives in
//! [`AuthService`](crate::services::AuthService).

use chrono::Utc;
use collate_common::{AppError, AppResult, IdGenerator};
use collate_db::{
    entities::{user, user::Role},
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::auth::{hash_password, validate_password_strength};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,

    #[serde(default)]
    pub name: Option<String>,

    pub role: Role,
}

/// Input for updating a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(default)]
    #[validate(length(max = 256))]
    pub name: Option<String>,

    #[serde(default)]
    pub role: Option<Role>,

    #[serde(default)]
    pub password: Option<String>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new user account.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
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
            role: Set(input.role),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.user_repo.create(model).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List all users.
    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.list().await
    }

    /// Update a user's name, role, or password.
    pub async fn update(&self, id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(Some(name));
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(password) = input.password {
            validate_password_strength(&password)?;
            active.password_hash = Set(hash_password(&password)?);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Delete a user.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        // Deleting a missing user is a 404, not a silent no-op.
        self.user_repo.get_by_id(id).await?;
        self.user_repo.delete(id).await
    }
}
