use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::presentation::{
    admin::views::{AdminDashboardTemplate, AdminLayout},
    views::render_template_response,
};

use super::{AdminState, DASHBOARD_PATH, session::AdminSession};

pub(super) async fn admin_root() -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}

pub(super) async fn admin_dashboard(
    State(state): State<AdminState>,
    AdminSession(principal): AdminSession,
) -> Response {
    let chrome = state.chrome.load(DASHBOARD_PATH, &principal);

    match state.dashboard.overview().await {
        Ok(content) => render_template_response(
            AdminDashboardTemplate {
                view: AdminLayout::new(chrome, content),
            },
            StatusCode::OK,
        ),
        Err(err) => err.into_response(),
    }
}
