//! 태스크 endpoint. 모든 요청에 인증이 필요합니다.
//!
//! - `GET /api/tasks?status=all|active|completed` - 내 태스크 목록
//! - `POST /api/tasks` - 생성
//! - `PUT /api/tasks/{id}` - 부분 수정
//! - `DELETE /api/tasks/{id}` - 삭제

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use taskboard_core::serde_helpers::{
    deserialize_due_date, deserialize_nullable, deserialize_patch_due_date,
};
use taskboard_core::{NewTask, Priority, Task, TaskPatch, TaskStatusFilter, TaskboardError};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{validate_not_blank, ValidatedJson};
use crate::routes::auth::MessageResponse;
use crate::state::AppState;

// ================================================================================================
// Request types
// ================================================================================================

/// 목록 조회 쿼리.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// all (기본값) | active | completed
    #[serde(default)]
    pub status: TaskStatusFilter,
}

/// 태스크 생성 요청.
///
/// `userId`, `id`, `createdAt` 등 알 수 없는 키는 무시됩니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 생략하거나 null이면 Medium
    #[serde(default)]
    pub priority: Option<Priority>,
    /// YYYY-MM-DD 또는 RFC 3339
    #[serde(default, deserialize_with = "deserialize_due_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority.unwrap_or_default(),
            due_date: req.due_date,
            completed: req.completed.unwrap_or(false),
        }
    }
}

/// 태스크 부분 수정 요청.
///
/// 생략한 필드는 그대로 유지되며, `description`과 `dueDate`는 null로 지울 수 있습니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deserialize_patch_due_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
            due_date: req.due_date,
            completed: req.completed,
        }
    }
}

/// 경로의 태스크 ID 파싱. 형식이 잘못된 ID도 "찾을 수 없음"으로 취급합니다.
fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Task not found"))
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 내 태스크 목록 (최신 생성 순).
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    params(ListTasksQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's tasks, newest first", body = [Task]),
        (status = 400, description = "Invalid status filter", body = ApiErrorResponse),
        (status = 401, description = "Missing token", body = ApiErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ApiErrorResponse)
    )
)]
pub async fn list_tasks(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query.map_err(|rejection| {
        ApiError(TaskboardError::validation("status", rejection.body_text()))
    })?;

    let tasks = state.tasks.list(user.id, query.status).await?;
    Ok(Json(tasks))
}

/// 태스크 생성.
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 401, description = "Missing token", body = ApiErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ApiErrorResponse)
    )
)]
pub async fn create_task(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.tasks.create(user.id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// 태스크 부분 수정.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 404, description = "No such task owned by caller", body = ApiErrorResponse)
    )
)]
pub async fn update_task(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;
    let task = state.tasks.update(user.id, id, req.into()).await?;
    Ok(Json(task))
}

/// 태스크 삭제.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 404, description = "No such task owned by caller", body = ApiErrorResponse)
    )
)]
pub async fn delete_task(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_task_id(&id)?;
    state.tasks.delete(user.id, id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

/// 태스크 라우터 생성.
pub fn tasks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", put(update_task).delete(delete_task))
}
