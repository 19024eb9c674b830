#![allow(dead_code)]

//! Test infrastructure for kg-server API tests

use kg_auth::{Argon2Hasher, AuthService, RetryPolicy, SessionPolicy, TokenSettings};
use kg_db::MemoryIdentityStore;
use kg_server::AppState;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const ACCESS_SECRET: &str = "access-secret-for-tests-0123456789abcdef";
pub const REFRESH_SECRET: &str = "refresh-secret-for-tests-0123456789abcde";
pub const FEDERATION_SECRET: &str = "federation-secret-for-tests-0123456789";
pub const PASSWORD: &str = "Abcdef1!";

/// Create AppState backed by an in-memory store with cheap hashing
pub fn create_test_app_state(
    federation_secret: Option<&str>,
    max_active_sessions: usize,
) -> (AppState, MemoryIdentityStore) {
    let store = MemoryIdentityStore::new();
    let auth = AuthService::new(
        Arc::new(store.clone()),
        Arc::new(Argon2Hasher::with_params(64, 1, 1).expect("valid argon2 params")),
        &TokenSettings::new(ACCESS_SECRET, REFRESH_SECRET),
        SessionPolicy {
            max_active_sessions,
        },
        RetryPolicy::default(),
    );

    (
        AppState::new(auth, federation_secret.map(str::to_string)),
        store,
    )
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn authorized_json_request(
    method: &str,
    uri: &str,
    bearer: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", bearer))
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Send one request through a clone of the router
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();

    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Register Ann and return the response body
pub async fn register_ann(app: &Router) -> serde_json::Value {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            serde_json::json!({"name": "Ann", "email": "ann@x.com", "password": PASSWORD}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}
