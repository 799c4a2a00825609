use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{AdminUsersRepo, CreateAdminUserParams, RepoError};
use crate::domain::{entities::AdminUserRecord, types::UserRole};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: UserRole,
    created_at: OffsetDateTime,
}

impl From<AdminUserRow> for AdminUserRecord {
    fn from(row: AdminUserRow) -> Self {
        AdminUserRecord {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AdminUsersRepo for PostgresRepositories {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM admin_users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AdminUserRecord::from))
    }

    async fn create_user(
        &self,
        params: CreateAdminUserParams,
    ) -> Result<AdminUserRecord, RepoError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r#"
            INSERT INTO admin_users (id, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.email)
        .bind(params.password_hash)
        .bind(params.role)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}
