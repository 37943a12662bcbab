//! PostgreSQL 저장소.
//!
//! 스키마는 `migrations/` 아래 SQL 파일로 관리되며 시작 시 적용됩니다.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use taskboard_core::{
    DatabaseConfig, NewUser, StorageBackend, Task, TaskPatch, TaskStatusFilter, User,
};

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};

// ================================================================================================
// Rows
// ================================================================================================

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    priority: String,
    due_date: Option<NaiveDate>,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let priority = row.priority.parse().map_err(StoreError::Corrupt)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            priority,
            due_date: row.due_date,
            completed: row.completed,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const TASK_COLUMNS: &str =
    "id, user_id, title, description, priority, due_date, completed, created_at";

/// sqlx 에러 중 제약 조건 위반을 저장소 에러로 분류.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Duplicate("email");
        }
        if db.is_foreign_key_violation() {
            return StoreError::MissingOwner;
        }
    }
    StoreError::Database(err)
}

// ================================================================================================
// Store
// ================================================================================================

/// PostgreSQL 저장소.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// 설정으로 연결 풀 생성.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("database.url is not set".into()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await?;

        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// 스키마 마이그레이션 적용.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, input: NewUser) -> StoreResult<User> {
        let user = User::new(input);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.into())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn delete_user_cascade(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query("DELETE FROM tasks WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let users = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if users.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        tracing::debug!(user_id = %id, tasks = tasks.rows_affected(), "Deleted user and tasks");
        Ok(true)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, owner: Uuid, filter: TaskStatusFilter) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE user_id = $1
              AND ($2::BOOLEAN IS NULL OR completed = $2)
            ORDER BY created_at DESC, id ASC
            "#
        ))
        .bind(owner)
        .bind(filter.completed())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn insert_task(&self, task: Task) -> StoreResult<Task> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO tasks (id, user_id, title, description, priority, due_date, completed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.completed)
        .bind(task.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Task::try_from(row)
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> StoreResult<Option<Task>> {
        // nullable 필드는 "변경 여부" 플래그와 새 값을 따로 바인딩
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE tasks SET
                title       = COALESCE($3, title),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                priority    = COALESCE($6, priority),
                due_date    = CASE WHEN $7 THEN $8 ELSE due_date END,
                completed   = COALESCE($9, completed)
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(patch.title.as_deref())
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.due_date.is_some())
        .bind(patch.due_date.flatten())
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Postgres
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
