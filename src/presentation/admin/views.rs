use askama::Template;

use crate::presentation::views::SpinnerPartial;

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub brand_title: String,
    pub page_title: String,
    pub navigation: Vec<AdminNavigationItemView>,
    pub user_email: String,
    pub site_url: String,
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub asset_version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self {
            chrome,
            asset_version: asset_version(),
            content,
        }
    }
}

fn asset_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Clone)]
pub struct AdminMetricView {
    pub label: String,
    pub value: String,
    pub hint: Option<String>,
}

impl AdminMetricView {
    pub fn new(label: &str, value: impl ToString, hint: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            hint: hint.map(str::to_string),
        }
    }
}

#[derive(Clone)]
pub struct DailyBarView {
    pub date: String,
    pub count: u64,
    pub height_percent: u8,
}

#[derive(Clone)]
pub struct StatsPanelView {
    pub metrics: Vec<AdminMetricView>,
    pub daily: Vec<DailyBarView>,
    pub generated_at: Option<String>,
    pub error: Option<String>,
}

impl StatsPanelView {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            metrics: Vec::new(),
            daily: Vec::new(),
            generated_at: None,
            error: Some(message.into()),
        }
    }

    pub fn has_metrics(&self) -> bool {
        !self.metrics.is_empty()
    }
}

#[derive(Clone)]
pub struct AdminDashboardView {
    pub stats: StatsPanelView,
    pub content_metrics: Vec<AdminMetricView>,
    pub base_url: String,
    pub environment: String,
}

impl AdminDashboardView {
    pub fn refresh_spinner(&self) -> SpinnerPartial {
        SpinnerPartial::labelled("Refreshing statistics…")
    }
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<AdminDashboardView>,
}

#[derive(Clone)]
pub struct VideoCardView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub provider_label: String,
    pub embed_url: String,
    pub watch_url: String,
    pub published: bool,
    pub created: String,
}

impl VideoCardView {
    pub fn embed(&self) -> VideoEmbedPartial<'_> {
        VideoEmbedPartial { video: self }
    }
}

#[derive(Clone, Default)]
pub struct VideoFormView {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published: bool,
}

#[derive(Clone)]
pub struct AdminVideosView {
    pub videos: Vec<VideoCardView>,
    pub total_count: usize,
    pub published_count: usize,
    pub form: VideoFormView,
    pub error: Option<String>,
}

impl AdminVideosView {
    pub fn has_videos(&self) -> bool {
        !self.videos.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/videos.html")]
pub struct AdminVideosTemplate {
    pub view: AdminLayout<AdminVideosView>,
}

/// Responsive iframe embed for a single video.
#[derive(Template)]
#[template(path = "partials/video_embed.html")]
pub struct VideoEmbedPartial<'a> {
    pub video: &'a VideoCardView,
}

#[derive(Clone)]
pub struct VectorRowView {
    pub id: String,
    pub source: String,
    pub preview: String,
    pub dimensions: i32,
    pub metadata: String,
    pub created: String,
}

#[derive(Clone)]
pub struct VectorSourceView {
    pub source: String,
    pub count: u64,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminVectorsView {
    pub documents: Vec<VectorRowView>,
    pub sources: Vec<VectorSourceView>,
    pub total: u64,
    pub page: u32,
    pub page_count: u32,
    pub active_source: Option<String>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

impl AdminVectorsView {
    pub fn has_documents(&self) -> bool {
        !self.documents.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/vectors.html")]
pub struct AdminVectorsTemplate {
    pub view: AdminLayout<AdminVectorsView>,
}

#[derive(Clone, Default)]
pub struct AdminLoginView {
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub view: AdminLoginView,
    pub asset_version: String,
}

impl AdminLoginTemplate {
    pub fn new(view: AdminLoginView) -> Self {
        Self {
            view,
            asset_version: asset_version(),
        }
    }
}
