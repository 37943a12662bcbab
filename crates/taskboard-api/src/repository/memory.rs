//! 메모리 저장소.
//!
//! 하나의 `RwLock` 아래 사용자/태스크/이메일 색인을 함께 보관합니다.
//! 모든 쓰기는 쓰기 락 한 번 안에서 끝나므로 계정 삭제와 태스크
//! 수정이 다른 요청에 부분적으로 보이지 않습니다.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use taskboard_core::{
    sort_newest_first, NewUser, StorageBackend, Task, TaskPatch, TaskStatusFilter, User,
};

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    emails: HashMap<String, Uuid>,
    tasks: HashMap<Uuid, Task>,
    closed: bool,
}

impl Inner {
    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Unavailable("memory store is closed".into()));
        }
        Ok(())
    }
}

/// 프로세스 메모리 저장소.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 태스크 수 (소유자 무관).
    pub async fn task_count(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    /// 저장된 사용자 수.
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, input: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        inner.ensure_open()?;

        if inner.emails.contains_key(&input.email) {
            return Err(StoreError::Duplicate("email"));
        }

        let user = User::new(input);
        inner.emails.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        inner.ensure_open()?;

        Ok(inner
            .emails
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn delete_user_cascade(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        inner.ensure_open()?;

        let Some(user) = inner.users.remove(&id) else {
            return Ok(false);
        };
        inner.emails.remove(&user.email);
        inner.tasks.retain(|_, task| !task.is_owned_by(id));
        Ok(true)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner: Uuid, filter: TaskStatusFilter) -> StoreResult<Vec<Task>> {
        let inner = self.inner.read().await;
        inner.ensure_open()?;

        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|task| task.is_owned_by(owner) && filter.matches(task))
            .cloned()
            .collect();
        sort_newest_first(&mut tasks);
        Ok(tasks)
    }

    async fn insert_task(&self, task: Task) -> StoreResult<Task> {
        let mut inner = self.inner.write().await;
        inner.ensure_open()?;

        if !inner.users.contains_key(&task.user_id) {
            return Err(StoreError::MissingOwner);
        }
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> StoreResult<Option<Task>> {
        let mut inner = self.inner.write().await;
        inner.ensure_open()?;

        match inner.tasks.get_mut(&id) {
            Some(task) if task.is_owned_by(owner) => {
                patch.apply_to(task);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        inner.ensure_open()?;

        let owned = inner
            .tasks
            .get(&id)
            .is_some_and(|task| task.is_owned_by(owner));
        if owned {
            inner.tasks.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.read().await.ensure_open()
    }

    async fn close(&self) {
        self.inner.write().await.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::{NewTask, Priority};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    fn new_task(owner: Uuid, title: &str) -> Task {
        Task::new(
            owner,
            NewTask {
                title: title.into(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@example.com")).await.unwrap();

        let err = store.insert_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_requires_owner() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice@example.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob@example.com")).await.unwrap();
        let task = store.insert_task(new_task(alice.id, "mine")).await.unwrap();

        let patch = TaskPatch {
            priority: Some(Priority::High),
            ..Default::default()
        };

        assert!(store.update_task(bob.id, task.id, &patch).await.unwrap().is_none());
        assert!(!store.delete_task(bob.id, task.id).await.unwrap());

        let listed = store.list_tasks(alice.id, TaskStatusFilter::All).await.unwrap();
        assert_eq!(listed[0].priority, Priority::Medium);

        let updated = store.update_task(alice.id, task.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.user_id, alice.id);
    }

    #[tokio::test]
    async fn test_delete_user_cascade_removes_only_own_tasks() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice@example.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob@example.com")).await.unwrap();
        store.insert_task(new_task(alice.id, "a1")).await.unwrap();
        store.insert_task(new_task(alice.id, "a2")).await.unwrap();
        store.insert_task(new_task(bob.id, "b1")).await.unwrap();

        assert!(store.delete_user_cascade(alice.id).await.unwrap());
        assert!(!store.delete_user_cascade(alice.id).await.unwrap());

        assert_eq!(store.task_count().await, 1);
        assert!(store.find_user_by_email("alice@example.com").await.unwrap().is_none());
        assert!(store.find_user_by_email("bob@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_email_reusable_after_delete() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("c@example.com")).await.unwrap();
        store.delete_user_cascade(user.id).await.unwrap();

        assert!(store.insert_user(new_user("c@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_insert_task_for_missing_owner() {
        let store = MemoryStore::new();
        let err = store
            .insert_task(new_task(Uuid::new_v4(), "orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingOwner));
        assert_eq!(store.task_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_filter_and_order() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("d@example.com")).await.unwrap();

        let mut older = new_task(user.id, "older");
        older.created_at -= chrono::Duration::minutes(5);
        older.completed = true;
        store.insert_task(older.clone()).await.unwrap();
        let newer = store.insert_task(new_task(user.id, "newer")).await.unwrap();

        let all = store.list_tasks(user.id, TaskStatusFilter::All).await.unwrap();
        assert_eq!(
            all.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![newer.id, older.id]
        );

        let done = store.list_tasks(user.id, TaskStatusFilter::Completed).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, older.id);

        let active = store.list_tasks(user.id, TaskStatusFilter::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let store = MemoryStore::new();
        assert!(store.ping().await.is_ok());
        store.close().await;
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
    }
}
