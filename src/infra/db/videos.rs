use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreateVideoParams, RepoError, VideosRepo};
use crate::domain::{entities::VideoRecord, types::VideoProvider};

use super::{PostgresRepositories, count_to_u64, map_sqlx_error};

const VIDEO_COLUMNS: &str = "id, title, description, provider, video_id, published, sort_order, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    provider: VideoProvider,
    video_id: String,
    published: bool,
    sort_order: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<VideoRow> for VideoRecord {
    fn from(row: VideoRow) -> Self {
        VideoRecord {
            id: row.id,
            title: row.title,
            description: row.description,
            provider: row.provider,
            video_id: row.video_id,
            published: row.published,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl VideosRepo for PostgresRepositories {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, RepoError> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos ORDER BY sort_order ASC, created_at ASC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(VideoRecord::from).collect())
    }

    async fn count_videos(&self, published: Option<bool>) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM videos WHERE ($1::bool IS NULL OR published = $1)",
        )
        .bind(published)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(count_to_u64(count))
    }

    async fn find_video(&self, id: Uuid) -> Result<Option<VideoRecord>, RepoError> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(VideoRecord::from))
    }

    async fn create_video(&self, params: CreateVideoParams) -> Result<VideoRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            INSERT INTO videos (id, title, description, provider, video_id, published, sort_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, (SELECT COALESCE(MAX(sort_order), -1) + 1 FROM videos), $7, $7)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(params.title)
        .bind(params.description)
        .bind(params.provider)
        .bind(params.video_id)
        .bind(params.published)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn set_video_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> Result<VideoRecord, RepoError> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "UPDATE videos SET published = $2, updated_at = $3 WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(id)
        .bind(published)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(VideoRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
