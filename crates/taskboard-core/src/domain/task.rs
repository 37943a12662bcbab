//! 태스크 타입 및 소유권 규칙.
//!
//! 이 모듈은 태스크 관련 타입을 정의합니다:
//! - `Priority` - 우선순위 (Low / Medium / High, 기본값 Medium)
//! - `Task` - 소유자 한 명에 귀속되는 태스크 엔티티
//! - `NewTask` - 생성 입력 (소유자 필드 없음)
//! - `TaskPatch` - 부분 수정 입력 (소유자 필드 없음)
//! - `TaskStatusFilter` - 목록 조회 상태 필터

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 태스크 우선순위.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// 저장소에 기록되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// 태스크 엔티티.
///
/// `user_id`는 생성 시 한 번 설정되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    /// 소유자 사용자 ID
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// 소유자를 강제로 지정하여 새 태스크를 생성합니다.
    pub fn new(owner: Uuid, input: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title: input.title,
            description: input.description,
            priority: input.priority,
            due_date: input.due_date,
            completed: input.completed,
            created_at: Utc::now(),
        }
    }

    /// 주어진 사용자가 소유자인지 확인.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// 검증을 마친 태스크 생성 입력.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    /// 생성과 동시에 완료 처리할지 여부 (기본값 false)
    pub completed: bool,
}

/// 검증을 마친 태스크 부분 수정 입력.
///
/// `None`은 "변경 없음"을 뜻합니다. `description`과 `due_date`의
/// `Some(None)`은 값을 지우라는 의미입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// 변경할 필드가 하나도 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }

    /// 태스크에 수정 사항을 적용합니다. 소유자, ID, 생성 시각은 건드리지 않습니다.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// 목록 조회 상태 필터.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TaskStatusFilter {
    #[default]
    All,
    /// 미완료 태스크
    Active,
    /// 완료된 태스크
    Completed,
}

impl TaskStatusFilter {
    /// 태스크가 필터 조건에 맞는지 확인.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskStatusFilter::All => true,
            TaskStatusFilter::Active => !task.completed,
            TaskStatusFilter::Completed => task.completed,
        }
    }

    /// 완료 여부 조건 (전체 조회면 `None`).
    pub fn completed(&self) -> Option<bool> {
        match self {
            TaskStatusFilter::All => None,
            TaskStatusFilter::Active => Some(false),
            TaskStatusFilter::Completed => Some(true),
        }
    }
}

/// 최신 생성 순 정렬 (생성 시각이 같으면 ID 순).
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
