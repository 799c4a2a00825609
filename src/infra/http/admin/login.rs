use axum::{
    Form,
    extract::State,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use metrics::counter;
use serde::Deserialize;
use tracing::{info, warn};

use crate::application::{error::ErrorReport, session::SessionError};
use crate::infra::telemetry::ADMIN_LOGIN_FAILURE_TOTAL;
use crate::presentation::{
    admin::views::{AdminLoginTemplate, AdminLoginView},
    views::render_template_response,
};

use super::{
    AdminState, DASHBOARD_PATH, LOGIN_PATH,
    session::{CurrentSession, removal_cookie, session_cookie},
};

const SOURCE: &str = "infra::http::admin::login";
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
const UNAVAILABLE_MESSAGE: &str = "Sign-in is temporarily unavailable. Please try again.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginForm {
    email: String,
    password: String,
}

pub(super) async fn admin_login_page(CurrentSession(session): CurrentSession) -> Response {
    match session {
        Some(principal) if principal.is_admin() => Redirect::to(DASHBOARD_PATH).into_response(),
        Some(principal) => render_login(
            AdminLoginView {
                notice: Some(format!(
                    "{} is signed in without admin access. Sign in with an admin account to continue.",
                    principal.email
                )),
                email: principal.email,
                error: None,
            },
            StatusCode::OK,
        ),
        None => render_login(AdminLoginView::default(), StatusCode::OK),
    }
}

pub(super) async fn admin_login_submit(
    State(state): State<AdminState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let throttle_key = form.email.trim().to_lowercase();

    if state.login_throttle.is_blocked(&throttle_key) {
        counter!(ADMIN_LOGIN_FAILURE_TOTAL).increment(1);
        let retry_after = state.login_throttle.retry_after_secs();
        let minutes = retry_after.div_ceil(60);
        let mut response = render_login(
            failed_view(
                &form.email,
                format!("Too many sign-in attempts. Try again in {minutes} minute(s)."),
            ),
            StatusCode::TOO_MANY_REQUESTS,
        );
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        ErrorReport::from_message(
            SOURCE,
            StatusCode::TOO_MANY_REQUESTS,
            "sign-in attempts throttled",
        )
        .attach(&mut response);
        return response;
    }

    match state.sessions.login(&form.email, &form.password).await {
        Ok(issued) => {
            state.login_throttle.reset(&throttle_key);
            info!(
                target = "cinder::http::admin::login",
                user_id = %issued.principal.user_id,
                role = %issued.principal.role,
                "admin signed in"
            );
            let cookie = session_cookie(&state.auth, issued.token, issued.expires_at);
            (jar.add(cookie), Redirect::to(DASHBOARD_PATH)).into_response()
        }
        Err(SessionError::InvalidCredentials) => {
            state.login_throttle.record_failure(&throttle_key);
            counter!(ADMIN_LOGIN_FAILURE_TOTAL).increment(1);
            let mut response = render_login(
                failed_view(&form.email, INVALID_CREDENTIALS_MESSAGE.to_string()),
                StatusCode::UNAUTHORIZED,
            );
            ErrorReport::from_message(SOURCE, StatusCode::UNAUTHORIZED, "invalid credentials")
                .attach(&mut response);
            response
        }
        Err(err) => {
            let mut response = render_login(
                failed_view(&form.email, UNAVAILABLE_MESSAGE.to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            );
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}

pub(super) async fn admin_logout(State(state): State<AdminState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(&state.auth.cookie_name)
        && let Err(err) = state.sessions.logout(cookie.value()).await
    {
        warn!(
            target = "cinder::http::admin::login",
            error = %err,
            "failed to delete admin session"
        );
    }

    let jar = jar.remove(removal_cookie(state.auth.cookie_name.clone()));
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

fn failed_view(email: &str, error: String) -> AdminLoginView {
    AdminLoginView {
        email: email.trim().to_string(),
        error: Some(error),
        notice: None,
    }
}

fn render_login(view: AdminLoginView, status: StatusCode) -> Response {
    render_template_response(AdminLoginTemplate::new(view), status)
}
