#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kevs_api::auth::session::SessionConfig;
use kevs_api::config::ServerConfig;
use kevs_api::router::build_app_router;
use kevs_api::state::AppState;
use kevs_db::chat_log::ChatLogStore;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router plus the temporary chat-log directory it writes to.
///
/// The directory is removed when the value is dropped.
pub struct TestApp {
    pub router: Router,
    pub chat_dir: TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(chat_log_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5000".to_string()],
        request_timeout_secs: 30,
        chat_log_dir,
        static_dir: None,
        seed_demo_user: false,
        expose_error_details: false,
        session: SessionConfig::default(),
    }
}

/// Build the full application router, middleware included, over `pool`.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let chat_dir = tempfile::tempdir().expect("temp dir should be created");
    let chat_log_dir = chat_dir.path().to_path_buf();
    build_test_app_with_chat_log(pool, chat_dir, chat_log_dir)
}

/// Like [`build_test_app`], but chat logs are written under `chat_log_dir`
/// instead of the root of `chat_dir`.
pub fn build_test_app_with_chat_log(
    pool: PgPool,
    chat_dir: TempDir,
    chat_log_dir: PathBuf,
) -> TestApp {
    let config = test_config(chat_log_dir.clone());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        chat_log: Arc::new(ChatLogStore::new(chat_log_dir)),
    };

    TestApp {
        router: build_app_router(state, &config),
        chat_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router should not fail")
}

pub async fn get(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    post_raw(app, uri, body.to_string(), cookie).await
}

pub async fn post_raw(
    app: &TestApp,
    uri: &str,
    body: impl Into<String>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::post(uri).header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body.into())).unwrap()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// The `name=value` pair from the response's session `Set-Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

pub async fn register(app: &TestApp, username: &str, email: &str, password: &str) {
    let body = serde_json::json!({
        "username": username,
        "admission": "A-1",
        "email": email,
        "password": password,
    });
    let response = post_json(app, "/api/register", body, None).await;
    assert_eq!(response.status(), StatusCode::OK, "registration should succeed");
}

/// Log in and return the session cookie pair.
pub async fn login(app: &TestApp, username: &str, password: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    session_cookie(&response)
}

/// Register `username` with `<username>@x.com` and log in.
pub async fn signup(app: &TestApp, username: &str) -> String {
    register(app, username, &format!("{username}@x.com"), "pw123").await;
    login(app, username, "pw123").await
}
