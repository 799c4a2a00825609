use async_trait::async_trait;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, VectorQueryFilter, VectorsRepo};
use crate::domain::entities::{VectorDocumentRecord, VectorSourceCount};

use super::{PostgresRepositories, count_to_u64, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct VectorDocumentRow {
    id: Uuid,
    source: String,
    content: String,
    metadata: Value,
    dimensions: i32,
    created_at: OffsetDateTime,
}

impl From<VectorDocumentRow> for VectorDocumentRecord {
    fn from(row: VectorDocumentRow) -> Self {
        VectorDocumentRecord {
            id: row.id,
            source: row.source,
            content: row.content,
            metadata: row.metadata,
            dimensions: row.dimensions,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SourceCountRow {
    source: String,
    count: i64,
}

#[async_trait]
impl VectorsRepo for PostgresRepositories {
    async fn list_documents(
        &self,
        filter: &VectorQueryFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<VectorDocumentRecord>, RepoError> {
        let offset = i64::try_from(offset).map_err(|_| RepoError::InvalidInput {
            message: "offset out of range".to_string(),
        })?;

        let rows = sqlx::query_as::<_, VectorDocumentRow>(
            r#"
            SELECT id, source, content, metadata, dimensions, created_at
            FROM vector_documents
            WHERE ($1::text IS NULL OR source = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.source.as_deref())
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(VectorDocumentRecord::from).collect())
    }

    async fn count_documents(&self, filter: &VectorQueryFilter) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM vector_documents WHERE ($1::text IS NULL OR source = $1)",
        )
        .bind(filter.source.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(count_to_u64(count))
    }

    async fn source_counts(&self) -> Result<Vec<VectorSourceCount>, RepoError> {
        let rows = sqlx::query_as::<_, SourceCountRow>(
            r#"
            SELECT source, COUNT(*) AS count
            FROM vector_documents
            GROUP BY source
            ORDER BY count DESC, source ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| VectorSourceCount {
                source: row.source,
                count: count_to_u64(row.count),
            })
            .collect())
    }

    async fn delete_document(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM vector_documents WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_source(&self, source: &str) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM vector_documents WHERE source = $1")
            .bind(source)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
