use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{BlogPostsRepo, RepoError};
use crate::domain::{entities::BlogPostRecord, types::BlogPostStatus};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct BlogPostRow {
    id: Uuid,
    slug: String,
    title: String,
    excerpt: Option<String>,
    content: String,
    author: Option<String>,
    tags: Vec<String>,
    status: BlogPostStatus,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BlogPostRow> for BlogPostRecord {
    fn from(row: BlogPostRow) -> Self {
        BlogPostRecord {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            author: row.author,
            tags: row.tags,
            status: row.status,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BlogPostsRepo for PostgresRepositories {
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<BlogPostRecord>, RepoError> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, slug, title, excerpt, content, author, tags, status,
                   published_at, created_at, updated_at
            FROM blog_posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(BlogPostRecord::from))
    }
}
