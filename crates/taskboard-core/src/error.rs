//! 태스크 보드의 에러 타입.
//!
//! 서비스 계층에서 발생하는 모든 실패는 [`TaskboardError`]로 분류되며,
//! API 계층이 이를 HTTP 상태 코드와 JSON 본문으로 변환합니다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 필드 단위 검증 실패 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct FieldViolation {
    /// 실패한 필드 이름 (JSON 키 기준)
    pub field: String,
    /// 사람이 읽을 수 있는 실패 사유
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum TaskboardError {
    /// 잘못된 입력 (실패한 모든 필드를 포함)
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldViolation>),

    /// 로그인 실패. 이메일 미존재와 비밀번호 불일치를 구분하지 않습니다.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 중복 리소스 (예: 이미 가입된 이메일)
    #[error("{0}")]
    Conflict(String),

    /// 찾을 수 없음. 소유자가 아닌 경우도 여기에 포함됩니다.
    #[error("{0}")]
    NotFound(String),

    /// 저장소/해싱 등 내부 실패
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type TaskboardResult<T> = Result<T, TaskboardError>;

impl TaskboardError {
    /// 단일 필드 검증 에러 생성.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, message)])
    }

    /// 에러 코드 문자열.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Conflict(_) => "CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_every_field() {
        let err = TaskboardError::Validation(vec![
            FieldViolation::new("email", "must be a valid email address"),
            FieldViolation::new("password", "must be at least 6 characters"),
        ]);

        let text = err.to_string();
        assert!(text.contains("email"));
        assert!(text.contains("password"));
    }

    #[test]
    fn test_codes() {
        assert_eq!(TaskboardError::validation("title", "required").code(), "VALIDATION_ERROR");
        assert_eq!(TaskboardError::Conflict("dup".into()).code(), "CONFLICT");
        assert_eq!(TaskboardError::Internal("x".into()).code(), "INTERNAL_ERROR");
    }
}
