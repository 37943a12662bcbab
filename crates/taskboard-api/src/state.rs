//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::JwtConfig;
use crate::repository::Store;
use crate::services::{AccountService, TaskService};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 저장소 (memory 또는 postgres)
    pub store: Arc<dyn Store>,

    /// 세션 토큰 서명 설정
    pub jwt: JwtConfig,

    /// 가입/로그인/계정 삭제
    pub accounts: AccountService,

    /// 태스크 CRUD
    pub tasks: TaskService,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    /// * `store` - 선택된 저장소 백엔드
    /// * `jwt` - 토큰 서명 설정
    pub fn new(store: Arc<dyn Store>, jwt: JwtConfig) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), jwt.clone()),
            tasks: TaskService::new(store.clone()),
            store,
            jwt,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 업타임(초) 계산.
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

impl FromRef<Arc<AppState>> for JwtConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.jwt.clone()
    }
}

/// 테스트용 AppState (메모리 저장소).
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use crate::repository::MemoryStore;

    AppState::new(
        Arc::new(MemoryStore::new()),
        JwtConfig::new("test-secret-key-for-jwt-testing", 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::StorageBackend;

    #[tokio::test]
    async fn test_state_defaults() {
        let state = create_test_state();
        assert_eq!(state.store.backend(), StorageBackend::Memory);
        assert!(state.store.ping().await.is_ok());
        assert!(state.uptime_secs() >= 0);
        assert!(!state.version.is_empty());
    }

    #[test]
    fn test_jwt_from_ref() {
        let state = Arc::new(create_test_state());
        let jwt = JwtConfig::from_ref(&state);
        assert_eq!(jwt.secret(), state.jwt.secret());
    }
}
