use crate::domain::password::PasswordHashingService;
use crate::domain::users::{NewUser, User, UserRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(length(min = 7, message = "Invalid username"))]
    #[schema(example = "sample_username", min_length = 7)]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "sample@example.com")]
    pub email: String,
    #[validate(length(min = 7, message = "Password must be greater than 6 characters"))]
    #[schema(example = "sample_password", min_length = 7)]
    pub password: String,
}

impl RegisterUserRequest {
    /// Email is not unique in storage, so registration is where duplicates are refused.
    pub async fn validate_unique_email(
        &self,
        repo: &Arc<dyn UserRepository>,
    ) -> Result<(), AppError> {
        if repo.find_by_email(&self.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        Ok(())
    }
}

pub struct RegisterUserUseCase {
    repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHashingService>,
}

impl RegisterUserUseCase {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            repo,
            password_hasher,
        }
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: RegisterUserRequest) -> Result<User, AppError> {
        req.validate_unique_email(&self.repo).await?;

        let password = self
            .password_hasher
            .hash_password(&req.password)
            .map_err(AppError::InternalServerError)?;

        let new_user = NewUser {
            username: req.username,
            email: req.email,
            password,
            verification_code: Some(Uuid::new_v4().simple().to_string()),
        };

        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }
}
