//! 계정 endpoint.
//!
//! - `POST /api/auth/register` - 가입
//! - `POST /api/auth/login` - 로그인 (세션 토큰 발급)
//! - `DELETE /api/auth/user` - 내 계정과 모든 태스크 삭제 (인증 필요)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use taskboard_core::PublicUser;

use crate::auth::AuthUser;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::{validate_email_address, validate_not_blank, ValidatedJson};
use crate::services::Registration;
use crate::state::AppState;

// ================================================================================================
// Request / Response
// ================================================================================================

/// 가입 요청.
///
/// 누락된 필드는 빈 문자열로 간주되어 필드별 검증 에러에 포함됩니다.
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

/// 로그인 요청.
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// `Authorization: Bearer <token>`으로 전달할 세션 토큰
    pub token: String,
    pub user: PublicUser,
}

/// 단순 메시지 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 가입.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid input or email already registered", body = ApiErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    state.accounts.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// 로그인.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(LoginResponse {
        token: session.token,
        user: session.user,
    }))
}

/// 내 계정 삭제.
#[utoipa::path(
    delete,
    path = "/api/auth/user",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account and all tasks deleted", body = MessageResponse),
        (status = 401, description = "Missing token", body = ApiErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ApiErrorResponse),
        (status = 404, description = "Account already deleted", body = ApiErrorResponse)
    )
)]
pub async fn delete_user(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.delete_account(user.id).await?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}

/// 계정 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user", delete(delete_user))
}
