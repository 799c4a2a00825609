use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const ADMIN_LOGIN_FAILURE_TOTAL: &str = "cinder_admin_login_failure_total";
pub const ADMIN_GUARD_REDIRECT_TOTAL: &str = "cinder_admin_guard_redirect_total";
pub const BLOG_NOT_FOUND_TOTAL: &str = "cinder_blog_not_found_total";
pub const STATS_FAILURE_TOTAL: &str = "cinder_stats_failure_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            ADMIN_LOGIN_FAILURE_TOTAL,
            Unit::Count,
            "Total number of rejected or throttled admin sign-in attempts."
        );
        describe_counter!(
            ADMIN_GUARD_REDIRECT_TOTAL,
            Unit::Count,
            "Total number of admin page requests redirected to the login page."
        );
        describe_counter!(
            BLOG_NOT_FOUND_TOTAL,
            Unit::Count,
            "Total number of blog lookups answered with 404."
        );
        describe_counter!(
            STATS_FAILURE_TOTAL,
            Unit::Count,
            "Total number of chat statistics requests that failed."
        );
    });
}
