//! Axum용 인증 게이트.
//!
//! 보호된 핸들러는 [`AuthUser`]를 첫 번째 인자로 받습니다. 추출기는
//! 저장소를 건드리기 전에 실행되므로, 토큰이 없거나 잘못된 요청은
//! 어떤 데이터도 읽거나 쓰지 못합니다.
//!
//! - `Authorization` 헤더 없음 / Bearer 토큰 없음 → 401 `Access Denied`
//! - 토큰은 있으나 서명 불일치, 형식 오류, 만료 → 403 `Session Expired`

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::jwt::{Claims, JwtConfig, JwtError};
use crate::error::ApiErrorResponse;

/// 인증된 호출자.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthRejection;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims.user_id().ok_or(AuthRejection::InvalidToken)?;
        Ok(Self {
            id,
            name: claims.name,
            email: claims.email,
        })
    }
}

/// 인증 거부 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("Access Denied")]
    MissingToken,
    #[error("Session Expired")]
    InvalidToken,
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthRejection::MissingToken => StatusCode::UNAUTHORIZED,
            AuthRejection::InvalidToken => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthRejection::MissingToken => "ACCESS_DENIED",
            AuthRejection::InvalidToken => "SESSION_EXPIRED",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        crate::metrics::record_auth_rejection(self.code());
        ApiErrorResponse::new(self.code(), self.to_string()).into_response_with(self.status())
    }
}

/// `Authorization` 헤더에서 Bearer 토큰 부분을 꺼냅니다.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtConfig: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let jwt = JwtConfig::from_ref(state);
        let claims = jwt.verify(token).map_err(|e| {
            match e {
                JwtError::TokenExpired => tracing::debug!("Rejected expired token"),
                other => tracing::debug!(error = %other, "Rejected invalid token"),
            }
            AuthRejection::InvalidToken
        })?;

        AuthUser::try_from(claims)
    }
}
