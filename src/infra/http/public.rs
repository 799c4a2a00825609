use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
    routing::get,
};
use metrics::counter;
use serde_json::json;

use crate::{
    application::{blog::BlogService, error::ErrorReport, repos::HealthRepo},
    infra::telemetry::BLOG_NOT_FOUND_TOTAL,
};

use super::{RouterState, db_health_response};

const SOURCE: &str = "infra::http::public::blog_post";
const BLOG_CACHE_CONTROL: &str = "public, max-age=3600";
const BLOG_NOT_FOUND_MESSAGE: &str = "Blog post not found";
const BLOG_FAILURE_MESSAGE: &str = "Failed to fetch blog post";

#[derive(Clone)]
pub struct HttpState {
    pub blog: Arc<BlogService>,
    pub health: Arc<dyn HealthRepo>,
}

pub fn build_router() -> Router<RouterState> {
    Router::new()
        .route("/api/content/blog/{slug}", get(blog_post))
        .route("/_health/db", get(public_health))
}

async fn blog_post(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    match state.blog.published_post(&slug).await {
        Ok(Some(post)) => {
            let mut response = Json(post).into_response();
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static(BLOG_CACHE_CONTROL));
            response
        }
        Ok(None) => {
            counter!(BLOG_NOT_FOUND_TOTAL).increment(1);
            let mut response = json_error(StatusCode::NOT_FOUND, BLOG_NOT_FOUND_MESSAGE);
            ErrorReport::from_message(
                SOURCE,
                StatusCode::NOT_FOUND,
                format!("no published post for slug `{slug}`"),
            )
            .attach(&mut response);
            response
        }
        Err(err) => {
            let mut response = json_error(StatusCode::INTERNAL_SERVER_ERROR, BLOG_FAILURE_MESSAGE);
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.health_check().await)
}

pub(super) fn json_error(status: StatusCode, message: &'static str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
