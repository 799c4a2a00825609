use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreateSessionParams, RepoError, SessionsRepo};
use crate::domain::{entities::SessionRecord, types::UserRole};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    prefix: String,
    hashed_secret: Vec<u8>,
    user_id: Uuid,
    email: String,
    role: UserRole,
    expires_at: OffsetDateTime,
    created_at: OffsetDateTime,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        SessionRecord {
            id: row.id,
            prefix: row.prefix,
            hashed_secret: row.hashed_secret,
            user_id: row.user_id,
            email: row.email,
            role: row.role,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SessionsRepo for PostgresRepositories {
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<SessionRecord, RepoError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            WITH inserted AS (
                INSERT INTO admin_sessions (id, prefix, hashed_secret, user_id, expires_at, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, prefix, hashed_secret, user_id, expires_at, created_at
            )
            SELECT i.id, i.prefix, i.hashed_secret, i.user_id, u.email, u.role, i.expires_at, i.created_at
            FROM inserted i
            INNER JOIN admin_users u ON u.id = i.user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.prefix)
        .bind(params.hashed_secret)
        .bind(params.user_id)
        .bind(params.expires_at)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_session_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Option<SessionRecord>, RepoError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT s.id, s.prefix, s.hashed_secret, s.user_id, u.email, u.role, s.expires_at, s.created_at
            FROM admin_sessions s
            INNER JOIN admin_users u ON u.id = s.user_id
            WHERE s.prefix = $1
            "#,
        )
        .bind(prefix)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SessionRecord::from))
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: OffsetDateTime) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }
}
