//! Data Access Layer
//!
//! PostgreSQL implementation of the session store. Each session is one row
//! holding the serialized state and a version counter; updates only apply when
//! the caller's version still matches.

use anyhow::Context;
use async_trait::async_trait;
use interview_core::{
    InterviewError, Result, SessionState,
    store::{SessionStore, Versioned, ensure_valid},
};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

/// A wrapper around the `PgPool` to provide a clear data access interface.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

#[derive(FromRow)]
struct SessionRow {
    version: i64,
    state_json: Json<SessionState>,
}

impl Db {
    /// Creates a new `Db` instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs all pending `sqlx` migrations.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for Db {
    async fn get(&self, id: Uuid) -> Result<Versioned<SessionState>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT version, state_json FROM interview_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load session")?
        .ok_or(InterviewError::NotFound(id))?;

        Ok(Versioned {
            version: row.version,
            value: ensure_valid(row.state_json.0)?,
        })
    }

    async fn create(&self, state: &SessionState) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO interview_sessions (id, version, state_json)
            VALUES ($1, 1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(state.session_id)
        .bind(Json(state))
        .execute(&self.pool)
        .await
        .context("Failed to insert session")?;

        if result.rows_affected() == 0 {
            return Err(InterviewError::DuplicateSession(state.session_id));
        }
        Ok(())
    }

    async fn compare_and_update(
        &self,
        id: Uuid,
        expected_version: i64,
        state: &SessionState,
    ) -> Result<i64> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE interview_sessions
            SET state_json = $3, version = version + 1, updated_at = now()
            WHERE id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(Json(state))
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update session")?;

        if let Some(version) = updated {
            return Ok(version);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM interview_sessions WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to check session existence")?;

        if exists {
            Err(InterviewError::Conflict(id))
        } else {
            Err(InterviewError::NotFound(id))
        }
    }
}
