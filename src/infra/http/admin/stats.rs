use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::counter;
use serde_json::json;
use tracing::error;

use crate::application::error::ErrorReport;
use crate::infra::http::public::json_error;
use crate::infra::telemetry::STATS_FAILURE_TOTAL;

use super::{AdminState, session::ApiAdminSession};

const SOURCE: &str = "infra::http::admin::stats::admin_stats";
const STATS_FAILURE_MESSAGE: &str = "Failed to fetch chat statistics";

/// `{ "success": true, "stats": … }`, or a generic 500 with no partial data.
pub(super) async fn admin_stats(
    State(state): State<AdminState>,
    ApiAdminSession(_principal): ApiAdminSession,
) -> Response {
    match state.stats.stats().await {
        Ok(stats) => Json(json!({ "success": true, "stats": stats })).into_response(),
        Err(err) => {
            counter!(STATS_FAILURE_TOTAL).increment(1);
            error!(
                target = "cinder::http::admin::stats",
                error = %err,
                "failed to fetch chat statistics"
            );
            let mut response = json_error(StatusCode::INTERNAL_SERVER_ERROR, STATS_FAILURE_MESSAGE);
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}
