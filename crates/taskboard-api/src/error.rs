//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트는 실패 시 같은 JSON 형식을 반환합니다:
//!
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Validation failed",
//!   "details": { "errors": [{ "field": "email", "message": "must be a valid email address" }] }
//! }
//! ```
//!
//! 인증 게이트의 401/403 응답도 같은 형식을 사용합니다 (`auth::AuthRejection`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use taskboard_core::{FieldViolation, TaskboardError};

use crate::repository::StoreError;

/// 통합 API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 상세 정보 (검증 실패 시 필드 목록)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성.
    ///
    /// ```
    /// use taskboard_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("NOT_FOUND", "Task not found");
    /// assert!(error.details.is_none());
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// 필드 검증 실패 목록으로 에러 생성.
    pub fn validation(violations: &[FieldViolation]) -> Self {
        Self::with_details(
            "VALIDATION_ERROR",
            "Validation failed",
            json!({ "errors": violations }),
        )
    }

    /// 상태 코드와 함께 응답으로 변환.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// 핸들러 에러.
///
/// 도메인 에러를 감싸 HTTP 응답으로 변환합니다.
#[derive(Debug)]
pub struct ApiError(pub TaskboardError);

/// 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TaskboardError::Validation(_)
            | TaskboardError::InvalidCredentials
            | TaskboardError::Conflict(_) => StatusCode::BAD_REQUEST,
            TaskboardError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self(TaskboardError::NotFound(message.into()))
    }
}

impl From<TaskboardError> for ApiError {
    fn from(err: TaskboardError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            TaskboardError::Validation(violations) => ApiErrorResponse::validation(violations),
            TaskboardError::Internal(detail) => {
                // 내부 사유는 로그에만 남기고 클라이언트에는 일반 메시지만 전달
                tracing::error!(error = %detail, "Internal server error");
                ApiErrorResponse::new(self.0.code(), "Internal server error")
            }
            other => ApiErrorResponse::new(other.code(), other.to_string()),
        };

        body.into_response_with(status)
    }
}
