//! 태스크 서비스.
//!
//! 모든 연산은 호출자(인증된 사용자) 범위 안에서만 동작합니다.
//! 타인의 태스크는 존재하지 않는 태스크와 똑같이 `NotFound`로 보입니다.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use taskboard_core::{
    NewTask, Task, TaskPatch, TaskStatusFilter, TaskboardError, TaskboardResult,
};

use crate::metrics;
use crate::repository::Store;

const TASK_NOT_FOUND: &str = "Task not found";

/// 태스크 서비스.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// 호출자의 태스크 목록 (최신 생성 순).
    pub async fn list(&self, owner: Uuid, filter: TaskStatusFilter) -> TaskboardResult<Vec<Task>> {
        Ok(self.store.list_tasks(owner, filter).await?)
    }

    /// 호출자 소유의 새 태스크 생성.
    pub async fn create(&self, owner: Uuid, mut input: NewTask) -> TaskboardResult<Task> {
        input.title = input.title.trim().to_string();
        if input.title.is_empty() {
            return Err(TaskboardError::validation("title", "must not be empty"));
        }
        input.description = input.description.filter(|d| !d.trim().is_empty());

        let task = self.store.insert_task(Task::new(owner, input)).await?;

        metrics::record_task_operation("created");
        debug!(task_id = %task.id, owner = %owner, "Task created");
        Ok(task)
    }

    /// 호출자 소유의 태스크 부분 수정.
    ///
    /// 빈 patch는 현재 상태를 그대로 반환합니다.
    pub async fn update(&self, owner: Uuid, id: Uuid, mut patch: TaskPatch) -> TaskboardResult<Task> {
        if let Some(title) = patch.title.as_mut() {
            *title = title.trim().to_string();
            if title.is_empty() {
                return Err(TaskboardError::validation("title", "must not be empty"));
            }
        }
        if let Some(description) = patch.description.as_mut() {
            *description = description.take().filter(|d| !d.trim().is_empty());
        }

        let task = self
            .store
            .update_task(owner, id, &patch)
            .await?
            .ok_or_else(|| TaskboardError::NotFound(TASK_NOT_FOUND.into()))?;

        metrics::record_task_operation("updated");
        debug!(task_id = %id, owner = %owner, "Task updated");
        Ok(task)
    }

    /// 호출자 소유의 태스크 삭제.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> TaskboardResult<()> {
        if !self.store.delete_task(owner, id).await? {
            return Err(TaskboardError::NotFound(TASK_NOT_FOUND.into()));
        }

        metrics::record_task_operation("deleted");
        debug!(task_id = %id, owner = %owner, "Task deleted");
        Ok(())
    }
}
