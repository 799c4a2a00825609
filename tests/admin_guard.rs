mod common;

use axum::http::{StatusCode, header};
use cinder::domain::types::UserRole;

use common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, COOKIE_NAME, TestApp, body_text, location, set_cookie_pair,
};

const GUARDED_PAGES: &[&str] = &["/admin/dashboard", "/admin/videos", "/admin/vectors"];

#[tokio::test]
async fn anonymous_requests_are_redirected_to_login() {
    let app = TestApp::new();

    for page in GUARDED_PAGES {
        let response = app.get(page, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{page}");
        assert_eq!(location(&response), Some("/admin/login"), "{page}");
    }
}

#[tokio::test]
async fn non_admin_roles_are_redirected_to_login() {
    let app = TestApp::new();

    for (email, role) in [
        ("editor@example.com", UserRole::Editor),
        ("viewer@example.com", UserRole::Viewer),
    ] {
        app.seed_user(email, ADMIN_PASSWORD, role).await;
        let cookie = app.login_cookie(email, ADMIN_PASSWORD).await;

        for page in GUARDED_PAGES {
            let response = app.get(page, Some(&cookie)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{email} {page}");
            assert_eq!(location(&response), Some("/admin/login"));
        }

        let login_page = app.get("/admin/login", Some(&cookie)).await;
        assert_eq!(login_page.status(), StatusCode::OK);
        let html = body_text(login_page).await;
        assert!(html.contains("without admin access"));
    }
}

#[tokio::test]
async fn admins_reach_guarded_pages() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    for page in GUARDED_PAGES {
        let response = app.get(page, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "{page}");
        let html = body_text(response).await;
        assert!(html.contains(ADMIN_EMAIL), "{page} shows the signed-in admin");
    }
}

#[tokio::test]
async fn admin_root_redirects_to_dashboard() {
    let app = TestApp::new();
    let response = app.get("/admin", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/dashboard"));
}

#[tokio::test]
async fn signed_in_admin_skips_login_form() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let response = app.get("/admin/login", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/dashboard"));
}

#[tokio::test]
async fn stale_cookie_is_cleared_on_redirect() {
    let app = TestApp::new();
    let stale = format!("{COOKIE_NAME}=cs_000000000000_{}", "f".repeat(64));

    let response = app.get("/admin/dashboard", Some(&stale)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("cookie removal");
    assert!(cleared.starts_with(&format!("{COOKIE_NAME}=")));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn mutations_require_admin_session() {
    let app = TestApp::new();
    let id = uuid::Uuid::new_v4();

    for uri in [
        format!("/admin/videos/{id}/delete"),
        format!("/admin/videos/{id}/publish"),
        format!("/admin/vectors/{id}/delete"),
        "/admin/vectors/purge".to_string(),
    ] {
        let response = app.post_form(&uri, "source=docs", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), Some("/admin/login"));
    }
}

#[tokio::test]
async fn login_sets_locked_down_cookie() {
    let app = TestApp::new();
    app.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin)
        .await;

    let response = app.login("Admin@Example.com", ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/dashboard"));

    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie");
    assert!(raw.starts_with(&format!("{COOKIE_NAME}=cs_")));
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("SameSite=Lax"));
    assert!(raw.contains("Path=/"));
}

#[tokio::test]
async fn wrong_password_rerenders_form() {
    let app = TestApp::new();
    app.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin)
        .await;

    let response = app.login(ADMIN_EMAIL, "not the password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_pair(&response).is_none());
    let html = body_text(response).await;
    assert!(html.contains("Invalid email or password."));
    assert!(html.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn repeated_failures_are_throttled() {
    let app = TestApp::with_login_limit(2);
    app.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin)
        .await;

    for _ in 0..2 {
        let response = app.login(ADMIN_EMAIL, "wrong password!").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let response = app.post_form("/admin/logout", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
    assert!(app.store.sessions.lock().unwrap().is_empty());

    let response = app.get("/admin/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
}

#[tokio::test]
async fn admin_stylesheet_is_served() {
    let app = TestApp::new();
    let response = app.get("/static/admin/admin.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/css; charset=utf-8")
    );

    let missing = app.get("/static/admin/missing.js", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
