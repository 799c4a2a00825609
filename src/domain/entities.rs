//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use serde_json::Value;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{BlogPostStatus, UserRole, VideoProvider};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub status: BlogPostStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub provider: VideoProvider,
    pub video_id: String,
    pub published: bool,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorDocumentRecord {
    pub id: Uuid,
    pub source: String,
    pub content: String,
    pub metadata: Value,
    pub dimensions: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorSourceCount {
    pub source: String,
    pub count: u64,
}

/// Aggregate counters over the whole chat log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatTotals {
    pub total_messages: u64,
    pub total_sessions: u64,
    pub messages_last_24h: u64,
    pub messages_last_7d: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyMessageCount {
    pub date: Date,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminUserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub prefix: String,
    pub hashed_secret: Vec<u8>,
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}
