use std::sync::Arc;

use axum::http::StatusCode;
use tracing::warn;

use crate::application::{
    error::HttpError,
    repos::{RepoError, VectorQueryFilter, VectorsRepo, VideosRepo},
    stats::{ChatStats, ChatStatsService},
};
use crate::config::DeploymentSettings;
use crate::presentation::{
    admin::views::{AdminDashboardView, AdminMetricView, DailyBarView, StatsPanelView},
    views::format_timestamp,
};

const SOURCE: &str = "application::admin::dashboard::AdminDashboardService";
const VIDEOS_FAILURE_MESSAGE: &str = "Failed to compute video dashboard metrics";
const VECTORS_FAILURE_MESSAGE: &str = "Failed to compute vector dashboard metrics";
const STATS_UNAVAILABLE_MESSAGE: &str = "Chat statistics are temporarily unavailable.";

#[derive(Clone)]
pub struct AdminDashboardService {
    stats: Arc<ChatStatsService>,
    videos: Arc<dyn VideosRepo>,
    vectors: Arc<dyn VectorsRepo>,
    deployment: DeploymentSettings,
}

impl AdminDashboardService {
    pub fn new(
        stats: Arc<ChatStatsService>,
        videos: Arc<dyn VideosRepo>,
        vectors: Arc<dyn VectorsRepo>,
        deployment: DeploymentSettings,
    ) -> Self {
        Self {
            stats,
            videos,
            vectors,
            deployment,
        }
    }

    /// Stats failures degrade to an inline message; content counts are required.
    pub async fn overview(&self) -> Result<AdminDashboardView, HttpError> {
        let (stats, content_metrics) =
            tokio::join!(self.collect_stats_panel(), self.collect_content_metrics());

        Ok(AdminDashboardView {
            stats,
            content_metrics: content_metrics?,
            base_url: self.deployment.base_url.clone(),
            environment: self.deployment.environment.as_str().to_string(),
        })
    }

    async fn collect_stats_panel(&self) -> StatsPanelView {
        match self.stats.stats().await {
            Ok(stats) => build_stats_panel(&stats),
            Err(err) => {
                warn!(
                    target = "cinder::application::admin::dashboard",
                    error = %err,
                    "chat statistics unavailable"
                );
                StatsPanelView::unavailable(STATS_UNAVAILABLE_MESSAGE)
            }
        }
    }

    async fn collect_content_metrics(&self) -> Result<Vec<AdminMetricView>, HttpError> {
        let filter = VectorQueryFilter::default();
        let (total_videos, published_videos, total_vectors, sources) = tokio::try_join!(
            async {
                self.videos
                    .count_videos(None)
                    .await
                    .map_err(|err| repo_failure(VIDEOS_FAILURE_MESSAGE, err))
            },
            async {
                self.videos
                    .count_videos(Some(true))
                    .await
                    .map_err(|err| repo_failure(VIDEOS_FAILURE_MESSAGE, err))
            },
            async {
                self.vectors
                    .count_documents(&filter)
                    .await
                    .map_err(|err| repo_failure(VECTORS_FAILURE_MESSAGE, err))
            },
            async {
                self.vectors
                    .source_counts()
                    .await
                    .map_err(|err| repo_failure(VECTORS_FAILURE_MESSAGE, err))
            },
        )?;

        Ok(vec![
            AdminMetricView::new("Videos", total_videos, None),
            AdminMetricView::new(
                "Published videos",
                published_videos,
                Some("Visible on the public site"),
            ),
            AdminMetricView::new("Vector documents", total_vectors, None),
            AdminMetricView::new(
                "Vector sources",
                sources.len(),
                Some("Distinct sources indexed for chat"),
            ),
        ])
    }
}

pub(crate) fn build_stats_panel(stats: &ChatStats) -> StatsPanelView {
    let peak = stats.daily.iter().map(|day| day.count).max().unwrap_or(0);
    let daily = stats
        .daily
        .iter()
        .map(|day| DailyBarView {
            date: day.date.clone(),
            count: day.count,
            height_percent: bar_height(day.count, peak),
        })
        .collect();

    StatsPanelView {
        metrics: vec![
            AdminMetricView::new("Total messages", stats.total_messages, None),
            AdminMetricView::new("Conversations", stats.total_sessions, None),
            AdminMetricView::new("Last 24 hours", stats.messages_last_24h, None),
            AdminMetricView::new("Last 7 days", stats.messages_last_7d, None),
            AdminMetricView::new(
                "Messages per conversation",
                format!("{:.2}", stats.average_messages_per_session),
                None,
            ),
        ],
        daily,
        generated_at: Some(format_timestamp(stats.generated_at)),
        error: None,
    }
}

fn bar_height(count: u64, peak: u64) -> u8 {
    if peak == 0 {
        return 0;
    }
    ((count * 100) / peak).min(100) as u8
}

fn repo_failure(message: &'static str, err: RepoError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        message,
        err.to_string(),
    )
}
