use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::infra::http::repo_error_to_http;
use crate::presentation::{
    admin::views::{AdminLayout, AdminVectorsTemplate},
    views::render_template_response,
};

use super::{AdminState, VECTORS_PATH, session::AdminSession};

const SOURCE: &str = "infra::http::admin::vectors";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct VectorsQuery {
    page: Option<u32>,
    source: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PurgeForm {
    source: String,
}

pub(super) async fn admin_vectors(
    State(state): State<AdminState>,
    AdminSession(principal): AdminSession,
    Query(query): Query<VectorsQuery>,
) -> Response {
    let source = query
        .source
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match state
        .vectors
        .listing(source, query.page.unwrap_or(1))
        .await
    {
        Ok(content) => {
            let chrome = state.chrome.load(VECTORS_PATH, &principal);
            render_template_response(
                AdminVectorsTemplate {
                    view: AdminLayout::new(chrome, content),
                },
                StatusCode::OK,
            )
        }
        Err(err) => repo_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn admin_vector_delete(
    State(state): State<AdminState>,
    AdminSession(_principal): AdminSession,
    Path(id): Path<Uuid>,
) -> Response {
    match state.vectors.delete(id).await {
        Ok(()) => Redirect::to(VECTORS_PATH).into_response(),
        Err(err) => repo_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn admin_vectors_purge(
    State(state): State<AdminState>,
    AdminSession(_principal): AdminSession,
    Form(form): Form<PurgeForm>,
) -> Response {
    match state.vectors.purge_source(&form.source).await {
        Ok(_) => Redirect::to(VECTORS_PATH).into_response(),
        Err(err) => repo_error_to_http(SOURCE, err).into_response(),
    }
}
