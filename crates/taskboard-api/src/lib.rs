//! 태스크 보드 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (계정, 태스크)
//! - JWT 인증 게이트
//! - PostgreSQL / 메모리 저장소
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 세션 토큰, 비밀번호 해싱, 인증 추출기
//! - [`services`]: 계정/태스크 비즈니스 로직
//! - [`repository`]: 저장소 트레이트와 백엔드
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서

pub mod auth;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{AuthRejection, AuthUser, Claims, JwtConfig};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{MemoryStore, PgStore, Store, StoreError, TaskStore, UserStore};
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(test)]
pub use state::create_test_state;
