//! 사용자 타입.
//!
//! - `User` - 저장소에 보관되는 사용자 레코드 (비밀번호 해시 포함)
//! - `PublicUser` - 클라이언트에 노출되는 공개 프로필
//! - `NewUser` - 가입 시 저장할 레코드 입력

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 저장된 사용자 레코드.
///
/// `password_hash`는 argon2 PHC 문자열이며 직렬화 대상이 아닙니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// 정규화된(소문자) 이메일. 전체 사용자 사이에서 유일합니다.
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 새 사용자 레코드 생성 (ID와 생성 시각 부여).
    pub fn new(input: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            created_at: Utc::now(),
        }
    }

    /// 공개 프로필로 변환.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// 사용자 공개 프로필.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// 저장소에 넘기는 신규 사용자 입력 (해싱 완료 상태).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// 이메일 정규화 (앞뒤 공백 제거 + 소문자).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
