//! Repository pattern for persistence.
//!
//! 서비스 계층은 [`Store`] 트레이트 객체만 알고, 실제 백엔드는
//! 설정에 따라 선택됩니다:
//! - [`PgStore`] - PostgreSQL (sqlx)
//! - [`MemoryStore`] - 프로세스 메모리 (개발/테스트용)
//!
//! 태스크 수정/삭제는 항상 `(task_id, owner)` 쌍으로 조건을 걸어
//! 한 번에 수행합니다. 소유권 확인과 쓰기 사이에 틈이 없습니다.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use taskboard_core::{
    NewUser, StorageBackend, Task, TaskPatch, TaskStatusFilter, TaskboardError, User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 유일성 제약 위반 (예: 이메일 중복)
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),

    /// 참조 대상 사용자가 없음 (삭제된 계정으로 태스크 생성 등)
    #[error("owner does not exist")]
    MissingOwner,

    /// 저장된 값을 도메인 타입으로 해석할 수 없음
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// 백엔드 사용 불가 (설정 누락, 종료됨 등)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// 저장소 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for TaskboardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => TaskboardError::Conflict("User already exists".into()),
            StoreError::MissingOwner => TaskboardError::NotFound("User not found".into()),
            other => TaskboardError::Internal(other.to_string()),
        }
    }
}

/// 사용자 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자 저장. 이메일이 이미 있으면 `StoreError::Duplicate`.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    /// 정규화된 이메일로 조회.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// 사용자와 그 사용자의 모든 태스크를 원자적으로 삭제.
    ///
    /// 사용자가 없으면 아무것도 지우지 않고 `Ok(false)`.
    /// 실패하면 사용자와 태스크 모두 그대로 남습니다.
    async fn delete_user_cascade(&self, id: Uuid) -> StoreResult<bool>;
}

/// 태스크 저장소. 모든 연산은 소유자 범위로 제한됩니다.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// 소유자의 태스크 목록 (최신 생성 순).
    async fn list_tasks(&self, owner: Uuid, filter: TaskStatusFilter) -> StoreResult<Vec<Task>>;

    /// 태스크 저장. 소유자가 없으면 `StoreError::MissingOwner`.
    async fn insert_task(&self, task: Task) -> StoreResult<Task>;

    /// `id`와 `owner`가 모두 일치하는 태스크에만 수정 적용.
    ///
    /// 일치하는 태스크가 없으면 `Ok(None)` (존재하지 않음과 타인 소유를 구분하지 않음).
    async fn update_task(&self, owner: Uuid, id: Uuid, patch: &TaskPatch)
        -> StoreResult<Option<Task>>;

    /// `id`와 `owner`가 모두 일치하는 태스크 삭제. 삭제했으면 `true`.
    async fn delete_task(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// 애플리케이션이 사용하는 전체 저장소.
#[async_trait]
pub trait Store: UserStore + TaskStore {
    /// 백엔드 종류.
    fn backend(&self) -> StorageBackend;

    /// 헬스 체크.
    async fn ping(&self) -> StoreResult<()>;

    /// 종료 시 연결 정리.
    async fn close(&self);
}
