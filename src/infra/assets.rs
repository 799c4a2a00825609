//! Embedded static asset serving.

use axum::{
    extract::Path,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::application::error::ErrorReport;

struct Asset {
    path: &'static str,
    contents: &'static str,
    content_type: &'static str,
}

static ADMIN_ASSETS: &[Asset] = &[Asset {
    path: "admin.css",
    contents: include_str!("../../static/admin/admin.css"),
    content_type: "text/css; charset=utf-8",
}];

/// Serve embedded admin static assets.
pub async fn serve_admin(Path(path): Path<String>) -> Response {
    match resolve_asset(ADMIN_ASSETS, &path) {
        Some(asset) => {
            let mut response = asset.contents.into_response();
            let headers = response.headers_mut();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(asset.content_type),
            );
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=86400"),
            );
            response
        }
        None => {
            let mut response = StatusCode::NOT_FOUND.into_response();
            ErrorReport::from_message(
                "infra::assets::serve_admin",
                StatusCode::NOT_FOUND,
                "Static asset not found",
            )
            .attach(&mut response);
            response
        }
    }
}

fn resolve_asset(bundle: &'static [Asset], path: &str) -> Option<&'static Asset> {
    let candidate = path.trim_start_matches('/');
    if candidate.is_empty() || candidate.contains("..") {
        return None;
    }
    bundle.iter().find(|asset| asset.path == candidate)
}
