use std::sync::Arc;

use tracing::debug;

use crate::application::repos::{BlogPostsRepo, RepoError};
use crate::domain::{entities::BlogPostRecord, slug::validate_slug};

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn BlogPostsRepo>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn BlogPostsRepo>) -> Self {
        Self { posts }
    }

    /// Resolve a post for public consumption.
    ///
    /// Returns `None` for malformed slugs, unknown slugs, and posts in any
    /// status other than published.
    pub async fn published_post(&self, slug: &str) -> Result<Option<BlogPostRecord>, RepoError> {
        if let Err(err) = validate_slug(slug) {
            debug!(
                target = "cinder::application::blog",
                slug,
                error = %err,
                "rejecting malformed slug"
            );
            return Ok(None);
        }

        let post = self.posts.find_post_by_slug(slug).await?;
        Ok(post.filter(|post| post.status.is_public()))
    }
}
