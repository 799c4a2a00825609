//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    AdminUserRecord, BlogPostRecord, ChatTotals, DailyMessageCount, SessionRecord,
    VectorDocumentRecord, VectorSourceCount, VideoRecord,
};
use crate::domain::types::{UserRole, VideoProvider};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn health_check(&self) -> Result<(), RepoError>;
}

#[async_trait]
pub trait BlogPostsRepo: Send + Sync {
    /// Look up a post by slug regardless of its status.
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<BlogPostRecord>, RepoError>;
}

#[async_trait]
pub trait ChatLogsRepo: Send + Sync {
    /// Totals with the rolling windows measured back from `now`.
    async fn chat_totals(&self, now: OffsetDateTime) -> Result<ChatTotals, RepoError>;

    /// Message counts grouped by UTC date for messages created at or after `since`.
    /// Dates without messages are omitted.
    async fn daily_message_counts(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<DailyMessageCount>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateVideoParams {
    pub title: String,
    pub description: Option<String>,
    pub provider: VideoProvider,
    pub video_id: String,
    pub published: bool,
}

#[async_trait]
pub trait VideosRepo: Send + Sync {
    /// All videos ordered by `sort_order`, then creation time.
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, RepoError>;

    async fn count_videos(&self, published: Option<bool>) -> Result<u64, RepoError>;

    async fn find_video(&self, id: Uuid) -> Result<Option<VideoRecord>, RepoError>;

    /// New videos are appended after the current highest `sort_order`.
    async fn create_video(&self, params: CreateVideoParams) -> Result<VideoRecord, RepoError>;

    async fn set_video_published(&self, id: Uuid, published: bool)
    -> Result<VideoRecord, RepoError>;

    async fn delete_video(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone, Default)]
pub struct VectorQueryFilter {
    pub source: Option<String>,
}

#[async_trait]
pub trait VectorsRepo: Send + Sync {
    /// Newest documents first.
    async fn list_documents(
        &self,
        filter: &VectorQueryFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<VectorDocumentRecord>, RepoError>;

    async fn count_documents(&self, filter: &VectorQueryFilter) -> Result<u64, RepoError>;

    /// Document counts per source, largest first.
    async fn source_counts(&self) -> Result<Vec<VectorSourceCount>, RepoError>;

    async fn delete_document(&self, id: Uuid) -> Result<(), RepoError>;

    /// Returns the number of deleted documents.
    async fn delete_source(&self, source: &str) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateAdminUserParams {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[async_trait]
pub trait AdminUsersRepo: Send + Sync {
    /// Emails are matched case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError>;

    async fn create_user(&self, params: CreateAdminUserParams)
    -> Result<AdminUserRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    pub prefix: String,
    pub hashed_secret: Vec<u8>,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
}

#[async_trait]
pub trait SessionsRepo: Send + Sync {
    async fn create_session(&self, params: CreateSessionParams)
    -> Result<SessionRecord, RepoError>;

    /// Resolves the session together with the owning user's current email and role.
    async fn find_session_by_prefix(&self, prefix: &str)
    -> Result<Option<SessionRecord>, RepoError>;

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError>;

    /// Returns the number of purged sessions.
    async fn delete_expired_sessions(&self, now: OffsetDateTime) -> Result<u64, RepoError>;
}
