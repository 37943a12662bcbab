//! 통합 테스트 공용 헬퍼.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use taskboard_api::auth::JwtConfig;
use taskboard_api::repository::{MemoryStore, Store};
use taskboard_api::routes::create_api_router;
use taskboard_api::state::AppState;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "hunter22";

/// 주어진 저장소로 전체 API 라우터 생성.
pub fn app_with_store(store: Arc<dyn Store>) -> Router {
    let state = AppState::new(store, JwtConfig::new(SECRET, 1));
    create_api_router().with_state(Arc::new(state))
}

/// 메모리 저장소 기반 라우터. 저장소 핸들도 함께 반환.
pub fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (app_with_store(store.clone()), store)
}

/// 요청 전송 후 (상태 코드, JSON 바디) 반환. 바디가 JSON이 아니면 `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// 미리 만든 요청 전송.
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// 가입 후 로그인하여 (토큰, 사용자 JSON) 반환.
pub async fn register_and_login(app: &Router, name: &str, email: &str) -> (String, Value) {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {}", email);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {}", email);

    let token = body["token"].as_str().unwrap().to_string();
    (token, body["user"].clone())
}

/// 태스크 생성 후 응답 JSON 반환.
pub async fn create_task(app: &Router, token: &str, body: Value) -> Value {
    let (status, task) = send(app, Method::POST, "/api/tasks", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    task
}
