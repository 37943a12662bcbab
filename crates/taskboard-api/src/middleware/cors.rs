//! CORS 설정.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// CORS 레이어 생성.
///
/// `origins`는 쉼표로 구분된 허용 origin 목록입니다 (`CORS_ORIGINS` 값).
/// 유효한 origin이 하나라도 있으면 해당 목록만 허용하고 자격 증명을 허용합니다.
/// 없거나 모두 잘못된 경우 모든 origin을 허용하되 자격 증명은 허용하지 않습니다.
/// (tower-http는 wildcard origin과 자격 증명 조합을 거부합니다.)
pub fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if allowed.is_empty() {
        match origins {
            Some(raw) if !raw.trim().is_empty() => {
                warn!("CORS_ORIGINS contains no valid origins, allowing any origin without credentials")
            }
            _ => warn!("CORS_ORIGINS not set, allowing any origin (development mode)"),
        }
        return base.allow_origin(AllowOrigin::any());
    }

    info!("CORS configured with {} allowed origins", allowed.len());
    base.allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn preflight(origins: Option<&str>, origin: &str) -> axum::response::Response {
        let app = Router::new()
            .route("/api/tasks", get(|| async { "OK" }))
            .layer(cors_layer(origins));

        app.oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/tasks")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_allow_list_with_credentials() {
        let response = preflight(
            Some("https://tasks.example.com, https://admin.example.com"),
            "https://tasks.example.com",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://tasks.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn test_unset_allows_any_origin() {
        let response = preflight(None, "https://anywhere.example").await;

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
    }

    #[tokio::test]
    async fn test_only_invalid_origins_falls_back_without_credentials() {
        // 제어 문자는 헤더 값으로 파싱되지 않음
        let response = preflight(Some("\u{1}bad, \u{7f}"), "https://anywhere.example").await;

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
    }
}
