//! 인증 게이트 통합 테스트
//!
//! 토큰이 없거나 유효하지 않으면 저장소에 도달하기 전에 거부되어야 한다.
//! 모든 메서드에서 panic하는 저장소로 이를 확인한다.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use uuid::Uuid;

use taskboard_api::auth::{create_token, Claims};
use taskboard_api::repository::{Store, StoreResult, TaskStore, UserStore};
use taskboard_core::{NewUser, StorageBackend, Task, TaskPatch, TaskStatusFilter, User};

use common::{app_with_store, send, send_request, SECRET};

/// 호출되면 panic하는 저장소.
struct PanicStore;

#[async_trait]
impl UserStore for PanicStore {
    async fn insert_user(&self, _user: NewUser) -> StoreResult<User> {
        panic!("store reached: insert_user")
    }

    async fn find_user_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
        panic!("store reached: find_user_by_email")
    }

    async fn delete_user_cascade(&self, _id: Uuid) -> StoreResult<bool> {
        panic!("store reached: delete_user_cascade")
    }
}

#[async_trait]
impl TaskStore for PanicStore {
    async fn list_tasks(&self, _owner: Uuid, _filter: TaskStatusFilter) -> StoreResult<Vec<Task>> {
        panic!("store reached: list_tasks")
    }

    async fn insert_task(&self, _task: Task) -> StoreResult<Task> {
        panic!("store reached: insert_task")
    }

    async fn update_task(
        &self,
        _owner: Uuid,
        _id: Uuid,
        _patch: &TaskPatch,
    ) -> StoreResult<Option<Task>> {
        panic!("store reached: update_task")
    }

    async fn delete_task(&self, _owner: Uuid, _id: Uuid) -> StoreResult<bool> {
        panic!("store reached: delete_task")
    }
}

#[async_trait]
impl Store for PanicStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

fn claims(exp_offset_secs: i64) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: Uuid::new_v4().to_string(),
        name: "Mallory".into(),
        email: "mallory@example.com".into(),
        iat: now,
        exp: now + exp_offset_secs,
        jti: Uuid::new_v4().to_string(),
    }
}

/// 보호된 모든 엔드포인트 (method, uri, body).
fn protected_requests() -> Vec<(Method, String, Option<serde_json::Value>)> {
    let id = Uuid::new_v4();
    vec![
        (Method::GET, "/api/tasks".into(), None),
        (Method::POST, "/api/tasks".into(), Some(json!({ "title": "x" }))),
        (Method::PUT, format!("/api/tasks/{}", id), Some(json!({ "completed": true }))),
        (Method::DELETE, format!("/api/tasks/{}", id), None),
        (Method::DELETE, "/api/auth/user".into(), None),
    ]
}

#[tokio::test]
async fn test_missing_token_is_access_denied() {
    let app = app_with_store(Arc::new(PanicStore));

    for (method, uri, body) in protected_requests() {
        let (status, resp) = send(&app, method.clone(), &uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(resp["code"], "ACCESS_DENIED");
        assert_eq!(resp["message"], "Access Denied");
    }
}

#[tokio::test]
async fn test_garbage_token_is_session_expired() {
    let app = app_with_store(Arc::new(PanicStore));

    for (method, uri, body) in protected_requests() {
        let (status, resp) = send(&app, method.clone(), &uri, Some("not.a.token"), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(resp["code"], "SESSION_EXPIRED");
        assert_eq!(resp["message"], "Session Expired");
    }
}

#[tokio::test]
async fn test_expired_token_is_session_expired() {
    let app = app_with_store(Arc::new(PanicStore));
    let token = create_token(&claims(-3600), SECRET).unwrap();

    for (method, uri, body) in protected_requests() {
        let (status, _) = send(&app, method.clone(), &uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_tampered_token_is_session_expired() {
    let app = app_with_store(Arc::new(PanicStore));

    let foreign = create_token(&claims(3600), "some-other-secret").unwrap();
    let (status, _) = send(&app, Method::GET, "/api/tasks", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 서명 앞부분을 바꿔 변조 (마지막 문자는 패딩 비트라 변경 효과가 없을 수 있음)
    let valid = create_token(&claims(3600), SECRET).unwrap();
    let (head, sig) = valid.rsplit_once('.').unwrap();
    let flipped = if sig.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);
    let (status, _) = send(&app, Method::GET, "/api/tasks", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_access_denied() {
    let app = app_with_store(Arc::new(PanicStore));
    let token = create_token(&claims(3600), SECRET).unwrap();

    for value in [format!("Basic {}", token), "Bearer".to_string(), "Bearer ".to_string()] {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/tasks")
            .header(header::AUTHORIZATION, value.clone())
            .body(Body::empty())
            .unwrap();
        let (status, _) = send_request(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{:?}", value);
    }
}
