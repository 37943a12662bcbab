//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/auth` - 가입, 로그인, 계정 삭제
//! - `/api/tasks` - 태스크 CRUD (인증 필요)

pub mod auth;
pub mod health;
pub mod tasks;

pub use auth::{auth_router, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
pub use health::{health_router, ComponentStatus, HealthResponse};
pub use tasks::{tasks_router, CreateTaskRequest, ListTasksQuery, UpdateTaskRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/auth", auth_router())
        .nest("/api/tasks", tasks_router())
}
