//! 요청 본문 추출과 검증.
//!
//! [`ValidatedJson`]은 JSON 역직렬화와 `validator` 검증을 한 번에 수행하고,
//! 실패 시 400 `VALIDATION_ERROR` 응답을 돌려줍니다. 검증 실패는 첫 번째
//! 필드에서 멈추지 않고 실패한 모든 필드를 필드명 순으로 보고합니다.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use taskboard_core::{normalize_email, FieldViolation, TaskboardError};

use crate::error::ApiError;

/// 검증된 JSON 본문 추출기.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| ApiError(validation_errors_to_error(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// 본문 파싱 실패를 검증 에러로 변환.
pub fn json_rejection_to_error(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    ApiError(TaskboardError::validation("body", rejection.body_text()))
}

/// `validator` 에러를 필드 목록으로 변환 (필드명 순 정렬).
pub fn validation_errors_to_error(errors: &ValidationErrors) -> TaskboardError {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = field.to_string();
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", e.code));
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    TaskboardError::Validation(violations)
}

// ==================== 커스텀 검증 함수 ====================

/// 공백만 있는 문자열 거부.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

/// 이메일 형식 검증 (앞뒤 공백과 대소문자는 정규화 후 판단).
pub fn validate_email_address(value: &str) -> Result<(), ValidationError> {
    if !normalize_email(value).validate_email() {
        return Err(ValidationError::new("email")
            .with_message("must be a valid email address".into()));
    }
    Ok(())
}
