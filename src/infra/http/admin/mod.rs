mod dashboard;
mod login;
mod rate_limit;
mod session;
mod state;
mod stats;
mod vectors;
mod videos;

pub use rate_limit::LoginThrottle;
pub use session::{AdminSession, ApiAdminSession, CurrentSession};
pub use state::AdminState;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::infra::assets;

use super::RouterState;

const LOGIN_PATH: &str = "/admin/login";
const DASHBOARD_PATH: &str = "/admin/dashboard";
const VIDEOS_PATH: &str = "/admin/videos";
const VECTORS_PATH: &str = "/admin/vectors";

pub fn build_admin_router(state: RouterState) -> Router<RouterState> {
    let session_state = state.admin.clone();

    let guarded = Router::new()
        .route("/admin", get(dashboard::admin_root))
        .route(
            LOGIN_PATH,
            get(login::admin_login_page).post(login::admin_login_submit),
        )
        .route("/admin/logout", post(login::admin_logout))
        .route(DASHBOARD_PATH, get(dashboard::admin_dashboard))
        .route(
            VIDEOS_PATH,
            get(videos::admin_videos).post(videos::admin_video_create),
        )
        .route(
            "/admin/videos/{id}/publish",
            post(videos::admin_video_publish),
        )
        .route("/admin/videos/{id}/delete", post(videos::admin_video_delete))
        .route(VECTORS_PATH, get(vectors::admin_vectors))
        .route("/admin/vectors/purge", post(vectors::admin_vectors_purge))
        .route(
            "/admin/vectors/{id}/delete",
            post(vectors::admin_vector_delete),
        )
        .route("/api/admin/stats", get(stats::admin_stats))
        .route_layer(middleware::from_fn_with_state(
            session_state,
            session::resolve_session,
        ));

    guarded.route("/static/admin/{*path}", get(assets::serve_admin))
}
