use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// A row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub reset_code: Option<String>,
    pub verification_code: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub verification_code: Option<String>,
}

/// Mutable fields of a user. `None` leaves a field untouched; for the code
/// columns `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub reset_code: Option<Option<String>>,
    pub verification_code: Option<Option<String>>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.reset_code.is_none()
            && self.verification_code.is_none()
    }

    /// Overwrites every field that is set. Timestamps are left to the store.
    pub fn apply_to(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(reset_code) = self.reset_code {
            user.reset_code = reset_code;
        }
        if let Some(verification_code) = self.verification_code {
            user.verification_code = verification_code;
        }
    }
}

/// Columns a user may be looked up by with [`UserRepository::find_by_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookupColumn {
    Email,
    ResetCode,
    VerificationCode,
}

impl UserLookupColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            UserLookupColumn::Email => "email",
            UserLookupColumn::ResetCode => "reset_code",
            UserLookupColumn::VerificationCode => "verification_code",
        }
    }

    /// Reads the value of this column from an in-memory record.
    pub fn value_of<'a>(&self, user: &'a User) -> Option<&'a str> {
        match self {
            UserLookupColumn::Email => Some(user.email.as_str()),
            UserLookupColumn::ResetCode => user.reset_code.as_deref(),
            UserLookupColumn::VerificationCode => user.verification_code.as_deref(),
        }
    }
}

impl fmt::Display for UserLookupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for UserLookupColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(UserLookupColumn::Email),
            "reset_code" => Ok(UserLookupColumn::ResetCode),
            "verification_code" => Ok(UserLookupColumn::VerificationCode),
            other => Err(AppError::ValidationError(format!(
                "Unknown lookup column '{}'",
                other
            ))),
        }
    }
}

/// Persistence operations on [`User`]. Lookups return the first match by
/// ascending id; mutations report a missing target as [`AppError::NotFound`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_code(
        &self,
        column: UserLookupColumn,
        code: &str,
    ) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn update_by_email(&self, email: &str, update: UpdateUser) -> Result<User, AppError>;
    async fn update_by_id(&self, id: i64, update: UpdateUser) -> Result<User, AppError>;
    async fn delete_by_email(&self, email: &str) -> Result<(), AppError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;
}
