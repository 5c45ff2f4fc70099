use crate::infrastructure::db::DbPool;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};

/// One pooled connection scoped to a single request.
///
/// The connection goes back to the pool when the session is dropped, which
/// happens on every exit path of the handler that opened it.
pub struct DbSession {
    conn: PoolConnection<Postgres>,
}

impl DbSession {
    #[tracing::instrument(skip(pool))]
    pub async fn open(pool: &DbPool) -> Result<Self, sqlx::Error> {
        let conn = pool.acquire().await?;
        tracing::trace!("session opened");
        Ok(Self { conn })
    }

    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        tracing::trace!("session closed");
    }
}
