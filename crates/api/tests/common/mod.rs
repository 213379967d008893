//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use autobazaar_api::config::{LogFormat, ServerConfig};
use autobazaar_api::middleware::rate_limit::RateLimitConfig;
use autobazaar_api::router::build_app_router;
use autobazaar_api::state::AppState;

pub const PASSWORD: &str = "pa55word!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
        token_ttl_hours: 24,
        home_feed_ttl_secs: 60,
        snapshot_dir: PathBuf::from("./data"),
        log_format: LogFormat::Pretty,
        rate_limit: RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    build_app_router(AppState::new(pool, config)).expect("test router should build")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should be handled")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, json_request("PUT", uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn registration(n: u32) -> Value {
    json!({
        "name": format!("Seller {n}"),
        "email": format!("seller{n}@example.com"),
        "phone": format!("300{n:07}"),
        "password": PASSWORD,
        "city": 1,
    })
}

/// Register user `n` and return the `data` payload.
pub async fn register(app: &Router, n: u32) -> Value {
    let response = post_json(app.clone(), "/api/v1/users/register", registration(n)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Authenticate user `n` and return the plaintext bearer token.
pub async fn login(app: &Router, n: u32) -> String {
    let body = json!({ "identifier": format!("seller{n}@example.com"), "password": PASSWORD });
    let response = post_json(app.clone(), "/api/v1/users/authentication", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["authentication_token"]["token"]
        .as_str()
        .expect("token should be a string")
        .to_string()
}

/// Register and log in user `n`.
pub async fn signed_in(app: &Router, n: u32) -> String {
    register(app, n).await;
    login(app, n).await
}

pub fn listing_payload() -> Value {
    json!({
        "gallery": [{ "url": "/gallery/front.webp", "order": 1 }],
        "make": 1,
        "model": 1,
        "version": 1,
        "year": 2019,
        "price": 3_400_000,
        "registration": 1,
        "city": 1,
        "area": 1,
        "mileage": "41000",
        "transmission": 2,
        "fueltype": 1,
        "engine_capacity": 1300,
        "body_type": 1,
        "color": 2,
        "details": "Original paint",
    })
}

/// Create a listing as the holder of `token` and return its id.
pub async fn create_listing(app: &Router, token: &str, payload: Value) -> i64 {
    let response = post_json_auth(app.clone(), "/api/v1/listings", token, payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["listing"]["id"]
        .as_i64()
        .expect("id should be an integer")
}
