//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 해싱 및 검증. 두 함수 모두 CPU를 많이 쓰므로
//! 비동기 컨텍스트에서는 `tokio::task::spawn_blocking`으로 감싸서 호출합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::OnceCell;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    HashingFailed,
    #[error("password does not match")]
    VerificationFailed,
    #[error("malformed password hash")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// 솔트는 매번 새로 생성되므로 같은 비밀번호도 다른 해시가 나옵니다.
///
/// # Arguments
///
/// * `password` - 해싱할 평문 비밀번호
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (`$argon2id$v=19$...`)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// # Arguments
///
/// * `password` - 검증할 평문 비밀번호
/// * `hash` - 저장된 PHC 형식 해시
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

static DUMMY_HASH: OnceCell<Option<String>> = OnceCell::new();

/// 존재하지 않는 계정으로 로그인할 때 검증에 쓰는 더미 해시.
///
/// 미가입 이메일과 비밀번호 불일치의 응답 시간을 비슷하게 맞춥니다.
pub fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password("taskboard-timing-equalizer").ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "hunter22";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).is_ok());
        assert!(matches!(
            verify_password("hunter23", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("secret1", &first).is_ok());
        assert!(verify_password("secret1", &second).is_ok());
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_dummy_hash_never_matches_user_input() {
        let hash = dummy_hash().unwrap();
        assert!(verify_password("password", hash).is_err());
    }
}
