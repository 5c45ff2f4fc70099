use crate::domain::users::{NewUser, UpdateUser, User, UserLookupColumn, UserRepository};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

/// In-memory repository mirroring the Postgres semantics
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn update_where<F>(&self, matches: F, update: UpdateUser, missing: String) -> Result<User, AppError>
    where
        F: Fn(&User) -> bool,
    {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| matches(&**u))
            .ok_or(AppError::NotFound(missing))?;

        if !update.is_empty() {
            update.apply_to(user);
            user.updated_at = OffsetDateTime::now_utc();
        }
        Ok(user.clone())
    }

    fn delete_where<F>(&self, matches: F, missing: String) -> Result<(), AppError>
    where
        F: Fn(&User) -> bool,
    {
        let mut users = self.users.lock().unwrap();
        let index = users
            .iter()
            .position(|u| matches(u))
            .ok_or(AppError::NotFound(missing))?;
        users.remove(index);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
            reset_code: None,
            verification_code: new_user.verification_code,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_by_code(UserLookupColumn::Email, email).await
    }

    async fn find_by_code(
        &self,
        column: UserLookupColumn,
        code: &str,
    ) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| column.value_of(u) == Some(code))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_by_email(&self, email: &str, update: UpdateUser) -> Result<User, AppError> {
        self.update_where(
            |u| u.email == email,
            update,
            format!("User with email '{}' not found", email),
        )
    }

    async fn update_by_id(&self, id: i64, update: UpdateUser) -> Result<User, AppError> {
        self.update_where(
            |u| u.id == id,
            update,
            format!("User with id '{}' not found", id),
        )
    }

    async fn delete_by_email(&self, email: &str) -> Result<(), AppError> {
        self.delete_where(
            |u| u.email == email,
            format!("User with email '{}' not found", email),
        )
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        self.delete_where(|u| u.id == id, format!("User with id '{}' not found", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "hash123".to_string(),
            verification_code: Some(format!("verify-{}", username)),
        }
    }

    #[tokio::test]
    async fn test_create_sets_identity_and_timestamps() {
        let repo = MockUserRepository::default();
        let user = repo
            .create(new_user("sample_username", "sample@example.com"))
            .await
            .unwrap();

        assert!(user.id > 0);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_find_by_email_missing_is_none() {
        let repo = MockUserRepository::default();
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_returns_first_match() {
        let repo = MockUserRepository::default();
        let first = repo.create(new_user("first_user", "same@example.com")).await.unwrap();
        repo.create(new_user("second_user", "same@example.com")).await.unwrap();

        let found = repo.find_by_email("same@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let repo = MockUserRepository::default();
        let created = repo.create(new_user("coded_user", "coded@example.com")).await.unwrap();

        let found = repo
            .find_by_code(UserLookupColumn::VerificationCode, "verify-coded_user")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);

        assert!(repo
            .find_by_code(UserLookupColumn::ResetCode, "verify-coded_user")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_by_id_then_read() {
        let repo = MockUserRepository::default();
        let created = repo.create(new_user("old_username", "old@example.com")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let update = UpdateUser {
            username: Some("new_username".to_string()),
            ..Default::default()
        };
        repo.update_by_id(created.id, update).await.unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "new_username");
        assert!(fetched.updated_at > created.updated_at);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_empty_update_keeps_timestamp() {
        let repo = MockUserRepository::default();
        let created = repo.create(new_user("steady_user", "steady@example.com")).await.unwrap();

        let updated = repo
            .update_by_email("steady@example.com", UpdateUser::default())
            .await
            .unwrap();
        assert_eq!(updated.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MockUserRepository::default();

        let by_email = repo
            .update_by_email("ghost@example.com", UpdateUser::default())
            .await;
        assert!(matches!(by_email, Err(AppError::NotFound(_))));

        let by_id = repo.update_by_id(99, UpdateUser::default()).await;
        assert!(matches!(by_id, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_read() {
        let repo = MockUserRepository::default();
        let created = repo.create(new_user("doomed_user", "doomed@example.com")).await.unwrap();

        repo.delete_by_id(created.id).await.unwrap();

        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = MockUserRepository::default();

        match repo.delete_by_id(42).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "User with id '42' not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert!(matches!(
            repo.delete_by_email("ghost@example.com").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_email_removes_only_first_match() {
        let repo = MockUserRepository::default();
        repo.create(new_user("first_user", "same@example.com")).await.unwrap();
        let second = repo.create(new_user("second_user", "same@example.com")).await.unwrap();

        repo.delete_by_email("same@example.com").await.unwrap();

        assert_eq!(repo.count(), 1);
        let remaining = repo.find_by_email("same@example.com").await.unwrap().unwrap();
        assert_eq!(remaining.id, second.id);
    }
}
