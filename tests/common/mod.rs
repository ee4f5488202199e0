#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use ucsb_api::{
    AppState,
    config::AppConfig,
    create_router,
    models::User,
    repository::{InMemoryUserRepository, Repositories, UserRepositoryState},
};
use uuid::Uuid;

// --- Fixed Identities ---

pub const USER_ID: Uuid = Uuid::from_u128(1);
pub const ADMIN_ID: Uuid = Uuid::from_u128(2);

pub fn plain_user() -> User {
    User {
        id: USER_ID,
        email: "user@ucsb.edu".to_string(),
        admin: false,
    }
}

pub fn admin_user() -> User {
    User {
        id: ADMIN_ID,
        email: "admin@ucsb.edu".to_string(),
        admin: true,
    }
}

pub fn test_users() -> UserRepositoryState {
    Arc::new(InMemoryUserRepository::with_users([plain_user(), admin_user()]))
}

/// Local config, so requests can authenticate with the `x-user-id` header.
pub fn test_state(repos: Repositories) -> AppState {
    AppState {
        users: test_users(),
        repos,
        config: AppConfig::default(),
    }
}

pub fn test_app(repos: Repositories) -> Router {
    create_router(test_state(repos))
}

// --- Request Helpers ---

pub fn request(method: Method, uri: &str, caller: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = caller {
        builder = builder.header("x-user-id", id.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, caller: Option<Uuid>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = caller {
        builder = builder.header("x-user-id", id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Sends one request through the router and returns the status with the parsed
/// JSON body (`Value::Null` when the body is empty).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
