//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3 스펙을 생성합니다. 문서는
//! `taskboard-api --export-openapi`로 stdout에 출력할 수 있습니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 요청/응답 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use taskboard_core::{FieldViolation, Priority, PublicUser, Task, TaskStatusFilter};

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentStatus, CreateTaskRequest, HealthResponse, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, UpdateTaskRequest,
};

/// Bearer 토큰 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

// ==================== OpenAPI 문서 정의 ====================

/// Taskboard API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskboard API",
        description = r#"
# Taskboard REST API

개인 태스크 관리를 위한 REST API입니다.

## 인증

`/api/tasks`와 `DELETE /api/auth/user`는 로그인 시 받은 토큰이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요.

- 헤더 없음 → 401 `ACCESS_DENIED`
- 잘못되었거나 만료된 토큰 → 403 `SESSION_EXPIRED`
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "계정 - 가입, 로그인, 계정 삭제"),
        (name = "tasks", description = "태스크 - 내 태스크 CRUD")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            FieldViolation,
            MessageResponse,

            // ===== Health =====
            HealthResponse,
            ComponentStatus,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            PublicUser,

            // ===== Tasks =====
            Task,
            Priority,
            TaskStatusFilter,
            CreateTaskRequest,
            UpdateTaskRequest,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::delete_user,

        crate::routes::tasks::list_tasks,
        crate::routes::tasks::create_task,
        crate::routes::tasks::update_task,
        crate::routes::tasks::delete_task,
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Taskboard API"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/auth/register"));
        assert!(json.contains("/api/auth/login"));
        assert!(json.contains("/api/auth/user"));
        assert!(json.contains("/api/tasks/{id}"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("CreateTaskRequest"));
        assert!(json.contains("LoginResponse"));
        assert!(!json.contains("password_hash"));
    }
}
