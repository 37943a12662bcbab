//! 인증.
//!
//! JWT 세션 토큰과 Argon2 비밀번호 해싱을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: 토큰 페이로드
//! - [`JwtConfig`]: 서명 키와 유효 기간, 토큰 발급/검증
//! - [`AuthUser`]: 보호된 라우트용 인증 추출기
//! - 비밀번호 해싱/검증 함수

mod jwt;
mod middleware;
mod password;

pub use jwt::{create_token, decode_token, Claims, JwtConfig, JwtError};
pub use middleware::{AuthRejection, AuthUser};
pub use password::{dummy_hash, hash_password, verify_password, PasswordError};
