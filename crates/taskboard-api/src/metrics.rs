//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 계정/태스크 비즈니스 메트릭을 수집하고
//! `/metrics` 엔드포인트로 노출합니다. 레코더가 설치되지 않은 테스트
//! 환경에서는 모든 기록 함수가 아무 일도 하지 않습니다.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설치하고 핸들을 반환합니다.
///
/// # Errors
///
/// 레코더가 이미 설치되어 있거나 버킷 설정이 잘못되면 `BuildError`.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 비즈니스 메트릭 헬퍼 함수
// ============================================================================

/// 가입 시도 결과 (`created`, `duplicate`).
pub fn record_registration(outcome: &'static str) {
    counter!("taskboard_registrations_total", "outcome" => outcome).increment(1);
}

/// 로그인 시도 결과 (`success`, `invalid_credentials`).
pub fn record_login(outcome: &'static str) {
    counter!("taskboard_logins_total", "outcome" => outcome).increment(1);
}

/// 인증 게이트 거부 (`ACCESS_DENIED`, `SESSION_EXPIRED`).
pub fn record_auth_rejection(code: &'static str) {
    counter!("taskboard_auth_rejections_total", "code" => code).increment(1);
}

/// 태스크 변경 (`created`, `updated`, `deleted`).
pub fn record_task_operation(operation: &'static str) {
    counter!("taskboard_task_operations_total", "operation" => operation).increment(1);
}

/// 계정 삭제.
pub fn record_account_deleted() {
    counter!("taskboard_accounts_deleted_total").increment(1);
}

/// 저장소 상태 (1 = 응답, 0 = 실패).
pub fn record_storage_up(up: bool) {
    gauge!("taskboard_storage_up").set(if up { 1.0 } else { 0.0 });
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 라우트에 매칭되지 않은 경로의 동적 세그먼트를 정규화합니다.
///
/// 예: `/api/tasks/123e4567-e89b-12d3-a456-426614174000` → `/api/tasks/{id}`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());

            if is_numeric || uuid::Uuid::try_parse(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/api/tasks/123e4567-e89b-12d3-a456-426614174000";
        assert_eq!(normalize_path(path), "/api/tasks/{id}");
    }

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/api/tasks/12345"), "/api/tasks/{id}");
    }

    #[test]
    fn test_normalize_path_no_params() {
        assert_eq!(normalize_path("/api/auth/login"), "/api/auth/login");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_registration("created");
        record_login("success");
        record_task_operation("created");
        record_account_deleted();
        record_storage_up(false);
    }
}
