use crate::domain::users::{NewUser, UpdateUser, User, UserLookupColumn, UserRepository};
use crate::infrastructure::session::DbSession;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::PgConnection;
use tokio::sync::Mutex;

const USER_COLUMNS: &str =
    "id, username, email, password, reset_code, verification_code, created_at, updated_at";

/// Postgres-backed [`UserRepository`] bound to one request's [`DbSession`].
pub struct PostgresUserRepository {
    session: Mutex<DbSession>,
}

impl PostgresUserRepository {
    pub fn new(session: DbSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

async fn fetch_by_column(
    conn: &mut PgConnection,
    column: UserLookupColumn,
    value: &str,
) -> Result<Option<User>, sqlx::Error> {
    // column names come from a closed enum, never from input
    let query = format!(
        "SELECT {} FROM users WHERE {} = $1 ORDER BY id LIMIT 1",
        USER_COLUMNS,
        column.column_name()
    );

    sqlx::query_as::<_, User>(&query)
        .bind(value)
        .fetch_optional(conn)
        .await
}

async fn fetch_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Writes back the full record and refreshes `updated_at`.
async fn persist(conn: &mut PgConnection, user: User) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE users
        SET username = $1, email = $2, password = $3, reset_code = $4,
            verification_code = $5, updated_at = NOW()
        WHERE id = $6
        RETURNING {}
        "#,
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&query)
        .bind(user.username)
        .bind(user.email)
        .bind(user.password)
        .bind(user.reset_code)
        .bind(user.verification_code)
        .bind(user.id)
        .fetch_optional(conn)
        .await
}

/// Read-modify-write on an already fetched record.
async fn apply_update(
    conn: &mut PgConnection,
    mut user: User,
    update: UpdateUser,
) -> Result<User, AppError> {
    if update.is_empty() {
        return Ok(user);
    }

    let id = user.id;
    update.apply_to(&mut user);

    persist(conn, user)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self, new_user))]
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut session = self.session.lock().await;
        let query = format!(
            r#"
            INSERT INTO users (username, email, password, verification_code)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(new_user.username)
            .bind(new_user.email)
            .bind(new_user.password)
            .bind(new_user.verification_code)
            .fetch_one(session.connection())
            .await?;

        tracing::debug!(user_id = user.id, "user created");
        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let mut session = self.session.lock().await;
        Ok(fetch_by_column(session.connection(), UserLookupColumn::Email, email).await?)
    }

    #[tracing::instrument(skip(self, code))]
    async fn find_by_code(
        &self,
        column: UserLookupColumn,
        code: &str,
    ) -> Result<Option<User>, AppError> {
        let mut session = self.session.lock().await;
        Ok(fetch_by_column(session.connection(), column, code).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let mut session = self.session.lock().await;
        Ok(fetch_by_id(session.connection(), id).await?)
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_by_email(&self, email: &str, update: UpdateUser) -> Result<User, AppError> {
        let mut session = self.session.lock().await;
        let conn = session.connection();

        let user = fetch_by_column(&mut *conn, UserLookupColumn::Email, email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with email '{}' not found", email)))?;

        apply_update(conn, user, update).await
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_by_id(&self, id: i64, update: UpdateUser) -> Result<User, AppError> {
        let mut session = self.session.lock().await;
        let conn = session.connection();

        let user = fetch_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;

        apply_update(conn, user, update).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_email(&self, email: &str) -> Result<(), AppError> {
        let mut session = self.session.lock().await;
        let conn = session.connection();

        let user = fetch_by_column(&mut *conn, UserLookupColumn::Email, email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with email '{}' not found", email)))?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(conn)
            .await?;

        tracing::debug!(user_id = user.id, "user deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        let mut session = self.session.lock().await;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(session.connection())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }

        tracing::debug!(user_id = id, "user deleted");
        Ok(())
    }
}
