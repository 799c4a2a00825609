use std::sync::Arc;

use tracing::info;
use url::form_urlencoded;
use uuid::Uuid;

use crate::application::repos::{RepoError, VectorQueryFilter, VectorsRepo};
use crate::domain::entities::VectorDocumentRecord;
use crate::presentation::{
    admin::views::{AdminVectorsView, VectorRowView, VectorSourceView},
    views::format_timestamp,
};

pub const VECTOR_PAGE_SIZE: u32 = 50;
const PREVIEW_CHARS: usize = 160;
const METADATA_CHARS: usize = 120;

#[derive(Clone)]
pub struct AdminVectorService {
    repo: Arc<dyn VectorsRepo>,
}

impl AdminVectorService {
    pub fn new(repo: Arc<dyn VectorsRepo>) -> Self {
        Self { repo }
    }

    /// Build one page of the listing. `page` is 1-based and clamped to the last page.
    pub async fn listing(
        &self,
        source: Option<String>,
        page: u32,
    ) -> Result<AdminVectorsView, RepoError> {
        let filter = VectorQueryFilter {
            source: source.clone(),
        };

        let (total, sources) =
            tokio::try_join!(self.repo.count_documents(&filter), self.repo.source_counts())?;

        let page_count = page_count(total);
        let page = page.clamp(1, page_count);
        let offset = u64::from(page - 1) * u64::from(VECTOR_PAGE_SIZE);
        let documents = self
            .repo
            .list_documents(&filter, VECTOR_PAGE_SIZE, offset)
            .await?;

        let sources = sources
            .into_iter()
            .map(|entry| VectorSourceView {
                href: listing_href(Some(&entry.source), 1),
                is_active: source.as_deref() == Some(entry.source.as_str()),
                source: entry.source,
                count: entry.count,
            })
            .collect();

        Ok(AdminVectorsView {
            documents: documents.iter().map(build_vector_row).collect(),
            sources,
            total,
            page,
            page_count,
            previous_href: (page > 1).then(|| listing_href(source.as_deref(), page - 1)),
            next_href: (page < page_count).then(|| listing_href(source.as_deref(), page + 1)),
            active_source: source,
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.repo.delete_document(id).await?;
        info!(
            target = "cinder::application::admin::vectors",
            document_id = %id,
            "vector document deleted"
        );
        Ok(())
    }

    pub async fn purge_source(&self, source: &str) -> Result<u64, RepoError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(RepoError::InvalidInput {
                message: "source is required".to_string(),
            });
        }
        let deleted = self.repo.delete_source(source).await?;
        info!(
            target = "cinder::application::admin::vectors",
            source,
            deleted,
            "vector source purged"
        );
        Ok(deleted)
    }
}

fn page_count(total: u64) -> u32 {
    let pages = total.div_ceil(u64::from(VECTOR_PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn listing_href(source: Option<&str>, page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(source) = source {
        query.append_pair("source", source);
    }
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }
    let query = query.finish();
    if query.is_empty() {
        "/admin/vectors".to_string()
    } else {
        format!("/admin/vectors?{query}")
    }
}

fn build_vector_row(record: &VectorDocumentRecord) -> VectorRowView {
    VectorRowView {
        id: record.id.to_string(),
        source: record.source.clone(),
        preview: truncate(&record.content, PREVIEW_CHARS),
        dimensions: record.dimensions,
        metadata: truncate(&record.metadata.to_string(), METADATA_CHARS),
        created: format_timestamp(record.created_at),
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_never_drops_below_one() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(50), 1);
        assert_eq!(page_count(51), 2);
    }

    #[test]
    fn listing_href_encodes_source() {
        assert_eq!(listing_href(None, 1), "/admin/vectors");
        assert_eq!(listing_href(None, 3), "/admin/vectors?page=3");
        assert_eq!(
            listing_href(Some("docs/faq & terms"), 2),
            "/admin/vectors?source=docs%2Ffaq+%26+terms&page=2"
        );
    }

    #[test]
    fn truncate_marks_elided_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
