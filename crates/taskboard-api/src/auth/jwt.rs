//! JWT 세션 토큰 처리.
//!
//! HS256 서명 토큰 발급과 검증. 토큰은 서버에 저장하지 않으며
//! 로그아웃이나 폐기 목록은 없습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskboard_core::{AuthConfig, User};

/// 세션 토큰 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 발급 시점의 사용자 이름
    pub name: String,
    /// 발급 시점의 이메일
    pub email: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    pub jti: String,
}

impl Claims {
    /// 사용자 정보로 새 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user` - 토큰을 발급받을 사용자
    /// * `ttl` - 유효 기간
    pub fn for_user(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// subject를 사용자 ID로 해석.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token encoding failed: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("token decoding failed")]
    DecodingError,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
}

/// 토큰 생성.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// 토큰 디코딩 및 서명/만료 검증.
pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
        _ => JwtError::DecodingError,
    })
}

/// 서명 키와 유효 기간.
///
/// `AppState`에 보관되며 인증 추출기가 `FromRef`로 꺼내 씁니다.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// 사용자에게 세션 토큰 발급.
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        create_token(&Claims::for_user(user, self.ttl), &self.secret)
    }

    /// 토큰 검증 후 Claims 반환.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode_token(token, &self.secret).map(|data| data.claims)
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.token_ttl_hours)
    }
}
