//! 태스크 보드 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 헬스 체크, 계정 관리, 태스크 CRUD 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use taskboard_api::auth::JwtConfig;
use taskboard_api::metrics::setup_metrics_recorder;
use taskboard_api::middleware::{cors_layer, metrics_layer};
use taskboard_api::repository::{MemoryStore, PgStore, Store};
use taskboard_api::routes::create_api_router;
use taskboard_api::services::{start_storage_monitor, DEFAULT_CHECK_INTERVAL};
use taskboard_api::state::AppState;
use taskboard_core::{init_logging, AppConfig, DatabaseConfig, LogConfig, StorageBackend};

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(std::env::var("CORS_ORIGINS").ok().as_deref()))
}

/// 설정에 따라 저장소 백엔드 생성.
///
/// postgres 백엔드는 연결 후 마이그레이션을 적용합니다.
async fn create_store(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn Store>> {
    match config.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will be lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let store = PgStore::connect(config)
                .await
                .context("failed to connect to PostgreSQL")?;
            store
                .migrate()
                .await
                .context("failed to apply database migrations")?;
            info!("Connected to PostgreSQL, migrations applied");
            Ok(Arc::new(store))
        }
    }
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use taskboard_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if !(export_flag || export_env) {
        return Ok(false);
    }

    let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
    println!("{}", json);
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    let config = AppConfig::load_default().context("failed to load configuration")?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting taskboard API server");

    let metrics_handle =
        setup_metrics_recorder().context("failed to install Prometheus recorder")?;

    if config.uses_default_secret() {
        warn!("JWT_SECRET not set, using the development secret. Do not run this in production");
    }

    let addr = config
        .socket_addr()
        .context("invalid server host/port")?;

    let store = create_store(&config.database).await?;
    info!(backend = %store.backend(), "Storage initialized");

    let state = Arc::new(AppState::new(store, JwtConfig::from(&config.auth)));
    if let Err(e) = state.accounts.warm_up().await {
        warn!(error = %e, "Failed to precompute dummy password hash");
    }
    let app = create_router(Arc::clone(&state), metrics_handle);

    info!(%addr, "API server listening");
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    let shutdown_token = CancellationToken::new();
    let monitor_handle = start_storage_monitor(
        Arc::clone(&state.store),
        DEFAULT_CHECK_INTERVAL,
        shutdown_token.clone(),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await
        .context("server error")?;

    info!("Server shutdown initiated, cleaning up...");

    // serve가 에러 없이 끝나도 토큰이 취소되지 않았을 수 있음
    shutdown_token.cancel();
    if let Err(e) = monitor_handle.await {
        warn!(error = %e, "Storage monitor task failed");
    }

    if tokio::time::timeout(Duration::from_secs(10), state.store.close())
        .await
        .is_err()
    {
        warn!("Storage close timed out, forcing shutdown");
    }

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
/// 시그널 핸들러 설치에 실패하면 해당 시그널은 무시됩니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // 백그라운드 task에 종료 전파
    shutdown_token.cancel();
}
