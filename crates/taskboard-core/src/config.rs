//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//!
//! 로드 순서 (뒤쪽이 우선):
//! 1. 내장 기본값
//! 2. 설정 파일 (선택, 기본 `config/default.toml`)
//! 3. `TASKBOARD__` 접두사 환경 변수 (예: `TASKBOARD__SERVER__PORT=8080`)
//! 4. 관례적인 환경 변수 `DATABASE_URL`, `JWT_SECRET`, `PORT`

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// 개발용 기본 JWT 시크릿. 운영 환경에서는 반드시 교체해야 합니다.
pub const DEFAULT_JWT_SECRET: &str = "dev-secret-key-change-in-production";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 저장소 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// 저장소 백엔드 종류.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 프로세스 메모리 (개발/테스트용, 재시작 시 소멸)
    #[default]
    Memory,
    /// PostgreSQL
    Postgres,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

/// 저장소 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 선택된 백엔드
    pub backend: StorageBackend,
    /// 연결 문자열 (postgres 백엔드에서 필수)
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            url: None,
            max_connections: 10,
            connect_timeout_secs: 10,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 세션 토큰 서명 키
    pub jwt_secret: String,
    /// 세션 토큰 유효 시간 (시간)
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_hours: 24,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨 필터
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "taskboard_api=info,taskboard_core=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// `path`가 `None`이거나 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// 관례적인 환경 변수 조회 함수를 지정하여 설정을 로드합니다.
    pub fn load_with_env<P, F>(path: Option<P>, lookup: F) -> Result<Self, config::ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?;

        // 파일에서 로드
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(false));
        }

        // 환경 변수로 오버라이드
        builder = builder.add_source(
            config::Environment::with_prefix("TASKBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.apply_env_overrides(lookup);
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(Some("config/default.toml"))
    }

    /// 관례적인 환경 변수(`DATABASE_URL`, `JWT_SECRET`, `PORT`)를 적용합니다.
    ///
    /// `DATABASE_URL`이 있으면 postgres 백엔드를 선택합니다.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
            self.database.backend = StorageBackend::Postgres;
        }

        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.auth.jwt_secret = secret;
        }

        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// 기본(안전하지 않은) JWT 시크릿을 사용 중인지 확인.
    pub fn uses_default_secret(&self) -> bool {
        self.auth.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.uses_default_secret());
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/taskboard"),
            ("JWT_SECRET", "a-much-better-secret"),
            ("PORT", "8081"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.backend, StorageBackend::Postgres);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/taskboard")
        );
        assert_eq!(config.auth.jwt_secret, "a-much-better-secret");
        assert_eq!(config.server.port, 8081);
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_backend_deserialization() {
        let backend: StorageBackend = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(backend, StorageBackend::Postgres);
        assert_eq!(StorageBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("taskboard-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.toml");
        std::fs::write(
            &path,
            "[server]\nport = 7070\n\n[auth]\ntoken_ttl_hours = 2\n",
        )
        .unwrap();

        let config = AppConfig::load_with_env(Some(&path), |_| None).unwrap();
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.auth.token_ttl_hours, 2);
        assert_eq!(config.logging.format, "pretty");

        std::fs::remove_dir_all(&dir).ok();
    }
}
