use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{CreateVideoParams, RepoError, VideosRepo};
use crate::domain::{
    entities::VideoRecord,
    error::DomainError,
    videos::{embed_url, parse_video_source, watch_url},
};
use crate::presentation::{admin::views::VideoCardView, views::format_timestamp};

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2_000;

#[derive(Debug, Error)]
pub enum AdminVideoError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateVideoCommand {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub published: bool,
}

#[derive(Clone)]
pub struct AdminVideoService {
    repo: Arc<dyn VideosRepo>,
}

impl AdminVideoService {
    pub fn new(repo: Arc<dyn VideosRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<VideoRecord>, AdminVideoError> {
        Ok(self.repo.list_videos().await?)
    }

    pub async fn create(&self, cmd: CreateVideoCommand) -> Result<VideoRecord, AdminVideoError> {
        let title = cmd.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title is required").into());
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            ))
            .into());
        }

        let description = cmd
            .description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if description
            .as_ref()
            .is_some_and(|value| value.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(DomainError::validation(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            ))
            .into());
        }

        let source = parse_video_source(&cmd.url)?;
        let record = self
            .repo
            .create_video(CreateVideoParams {
                title: title.to_string(),
                description,
                provider: source.provider,
                video_id: source.video_id,
                published: cmd.published,
            })
            .await?;

        info!(
            target = "cinder::application::admin::videos",
            video_id = %record.id,
            provider = record.provider.as_str(),
            "video created"
        );
        Ok(record)
    }

    /// Flip the publication flag and return the updated record.
    pub async fn toggle_published(&self, id: Uuid) -> Result<VideoRecord, AdminVideoError> {
        let current = self
            .repo
            .find_video(id)
            .await?
            .ok_or(DomainError::not_found("video"))?;
        Ok(self
            .repo
            .set_video_published(id, !current.published)
            .await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AdminVideoError> {
        self.repo.delete_video(id).await?;
        info!(
            target = "cinder::application::admin::videos",
            video_id = %id,
            "video deleted"
        );
        Ok(())
    }
}

pub fn build_video_card(record: &VideoRecord) -> VideoCardView {
    VideoCardView {
        id: record.id.to_string(),
        title: record.title.clone(),
        description: record.description.clone(),
        provider_label: record.provider.display_name().to_string(),
        embed_url: embed_url(record.provider, &record.video_id),
        watch_url: watch_url(record.provider, &record.video_id),
        published: record.published,
        created: format_timestamp(record.created_at),
    }
}
