//! Admin session resolution: a layer that resolves the session cookie once
//! per request, and extractors that hand the signed-in principal to handlers.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use metrics::counter;
use time::OffsetDateTime;
use tracing::warn;

use crate::application::{
    error::ErrorReport,
    session::{SessionError, SessionPrincipal},
};
use crate::config::AuthSettings;
use crate::infra::telemetry::ADMIN_GUARD_REDIRECT_TOTAL;

use super::{AdminState, LOGIN_PATH};
use crate::infra::http::public::json_error;

#[derive(Debug, Clone)]
enum SessionLookup {
    Anonymous,
    /// A cookie was sent but no longer names a live session.
    Stale { cookie_name: String },
    Active(SessionPrincipal),
}

pub(super) async fn resolve_session(
    State(state): State<AdminState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let lookup = match jar.get(&state.auth.cookie_name) {
        None => SessionLookup::Anonymous,
        Some(cookie) => match state.sessions.authenticate(cookie.value()).await {
            Ok(principal) => SessionLookup::Active(principal),
            Err(SessionError::Invalid | SessionError::Expired) => SessionLookup::Stale {
                cookie_name: state.auth.cookie_name.clone(),
            },
            Err(err) => {
                warn!(
                    target = "cinder::http::admin::session",
                    error = %err,
                    "failed to resolve admin session"
                );
                SessionLookup::Anonymous
            }
        },
    };

    let principal = match &lookup {
        SessionLookup::Active(principal) => Some(principal.clone()),
        _ => None,
    };
    request.extensions_mut().insert(lookup);

    let mut response = next.run(request).await;
    if let Some(principal) = principal {
        response.extensions_mut().insert(principal);
    }
    response
}

fn lookup(parts: &Parts) -> Option<&SessionLookup> {
    parts.extensions.get::<SessionLookup>()
}

fn stale_cookie(lookup: Option<&SessionLookup>) -> Option<String> {
    match lookup {
        Some(SessionLookup::Stale { cookie_name }) => Some(cookie_name.clone()),
        _ => None,
    }
}

/// The signed-in admin. Requests without an admin session are redirected to the login page.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionPrincipal);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AdminRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match lookup(parts) {
            Some(SessionLookup::Active(principal)) if principal.is_admin() => {
                Ok(Self(principal.clone()))
            }
            other => Err(AdminRedirect {
                clear_cookie: stale_cookie(other),
            }),
        }
    }
}

/// Like [`AdminSession`], but rejects with a JSON 401 for API routes.
#[derive(Debug, Clone)]
pub struct ApiAdminSession(pub SessionPrincipal);

impl<S> FromRequestParts<S> for ApiAdminSession
where
    S: Send + Sync,
{
    type Rejection = ApiUnauthorized;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match lookup(parts) {
            Some(SessionLookup::Active(principal)) if principal.is_admin() => {
                Ok(Self(principal.clone()))
            }
            other => Err(ApiUnauthorized {
                clear_cookie: stale_cookie(other),
            }),
        }
    }
}

/// Whoever is signed in, admin or not.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<SessionPrincipal>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(match lookup(parts) {
            Some(SessionLookup::Active(principal)) => Some(principal.clone()),
            _ => None,
        }))
    }
}

#[derive(Debug)]
pub struct AdminRedirect {
    clear_cookie: Option<String>,
}

impl IntoResponse for AdminRedirect {
    fn into_response(self) -> Response {
        counter!(ADMIN_GUARD_REDIRECT_TOTAL).increment(1);
        let redirect = Redirect::to(LOGIN_PATH);
        match self.clear_cookie {
            Some(name) => (CookieJar::new().remove(removal_cookie(name)), redirect).into_response(),
            None => redirect.into_response(),
        }
    }
}

#[derive(Debug)]
pub struct ApiUnauthorized {
    clear_cookie: Option<String>,
}

impl IntoResponse for ApiUnauthorized {
    fn into_response(self) -> Response {
        let body = json_error(StatusCode::UNAUTHORIZED, "Unauthorized");
        let mut response = match self.clear_cookie {
            Some(name) => (CookieJar::new().remove(removal_cookie(name)), body).into_response(),
            None => body,
        };
        ErrorReport::from_message(
            "infra::http::admin::session::ApiAdminSession",
            StatusCode::UNAUTHORIZED,
            "admin session required",
        )
        .attach(&mut response);
        response
    }
}

pub(super) fn session_cookie(
    auth: &AuthSettings,
    token: String,
    expires_at: OffsetDateTime,
) -> Cookie<'static> {
    Cookie::build((auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.secure_cookie)
        .expires(expires_at)
        .build()
}

pub(super) fn removal_cookie(name: String) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_locked_down() {
        let auth = AuthSettings {
            secure_cookie: true,
            ..AuthSettings::default()
        };
        let cookie = session_cookie(
            &auth,
            "cs_abc_secret".to_string(),
            OffsetDateTime::now_utc(),
        );

        assert_eq!(cookie.name(), "cinder_session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn redirect_clears_stale_cookie() {
        let response = AdminRedirect {
            clear_cookie: Some("cinder_session".to_string()),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let set_cookie = response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .expect("set-cookie header");
        assert!(set_cookie.starts_with("cinder_session="));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
