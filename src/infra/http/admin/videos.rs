use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::{
    admin::videos::{AdminVideoError, CreateVideoCommand, build_video_card},
    error::HttpError,
    session::SessionPrincipal,
};
use crate::domain::error::DomainError;
use crate::infra::http::repo_error_to_http;
use crate::presentation::{
    admin::views::{AdminLayout, AdminVideosTemplate, AdminVideosView, VideoFormView},
    views::render_template_response,
};

use super::{AdminState, VIDEOS_PATH, session::AdminSession};

const SOURCE: &str = "infra::http::admin::videos";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct VideoForm {
    title: String,
    description: String,
    url: String,
    published: Option<String>,
}

impl VideoForm {
    fn is_published(&self) -> bool {
        self.published
            .as_deref()
            .is_some_and(|value| matches!(value, "on" | "true" | "1"))
    }
}

pub(super) async fn admin_videos(
    State(state): State<AdminState>,
    AdminSession(principal): AdminSession,
) -> Response {
    render_videos_page(
        &state,
        &principal,
        VideoFormView::default(),
        None,
        StatusCode::OK,
    )
    .await
}

pub(super) async fn admin_video_create(
    State(state): State<AdminState>,
    AdminSession(principal): AdminSession,
    Form(form): Form<VideoForm>,
) -> Response {
    let published = form.is_published();
    let command = CreateVideoCommand {
        title: form.title.clone(),
        description: Some(form.description.clone()),
        url: form.url.clone(),
        published,
    };

    match state.videos.create(command).await {
        Ok(_) => Redirect::to(VIDEOS_PATH).into_response(),
        Err(AdminVideoError::Domain(err)) => {
            let form_view = VideoFormView {
                title: form.title,
                description: form.description,
                url: form.url,
                published,
            };
            render_videos_page(
                &state,
                &principal,
                form_view,
                Some(domain_message(&err)),
                StatusCode::BAD_REQUEST,
            )
            .await
        }
        Err(AdminVideoError::Repo(err)) => repo_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn admin_video_publish(
    State(state): State<AdminState>,
    AdminSession(_principal): AdminSession,
    Path(id): Path<Uuid>,
) -> Response {
    match state.videos.toggle_published(id).await {
        Ok(_) => Redirect::to(VIDEOS_PATH).into_response(),
        Err(err) => video_error_to_http(err).into_response(),
    }
}

pub(super) async fn admin_video_delete(
    State(state): State<AdminState>,
    AdminSession(_principal): AdminSession,
    Path(id): Path<Uuid>,
) -> Response {
    match state.videos.delete(id).await {
        Ok(()) => Redirect::to(VIDEOS_PATH).into_response(),
        Err(err) => video_error_to_http(err).into_response(),
    }
}

async fn render_videos_page(
    state: &AdminState,
    principal: &SessionPrincipal,
    form: VideoFormView,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let videos = match state.videos.list().await {
        Ok(videos) => videos,
        Err(err) => return video_error_to_http(err).into_response(),
    };

    let cards: Vec<_> = videos.iter().map(build_video_card).collect();
    let published_count = cards.iter().filter(|card| card.published).count();
    let content = AdminVideosView {
        total_count: cards.len(),
        published_count,
        videos: cards,
        form,
        error,
    };

    let chrome = state.chrome.load(VIDEOS_PATH, principal);
    render_template_response(
        AdminVideosTemplate {
            view: AdminLayout::new(chrome, content),
        },
        status,
    )
}

fn domain_message(err: &DomainError) -> String {
    match err {
        DomainError::Validation { message } => message.clone(),
        DomainError::NotFound { entity } => format!("{entity} not found"),
    }
}

fn video_error_to_http(err: AdminVideoError) -> HttpError {
    match err {
        AdminVideoError::Domain(DomainError::NotFound { .. }) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Video not found",
            err.to_string(),
        ),
        AdminVideoError::Domain(DomainError::Validation { ref message }) => HttpError::new(
            SOURCE,
            StatusCode::BAD_REQUEST,
            "Invalid video",
            message.clone(),
        ),
        AdminVideoError::Repo(repo) => repo_error_to_http(SOURCE, repo),
    }
}
