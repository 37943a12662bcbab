//! 계정 서비스.
//!
//! 가입, 로그인, 계정 삭제를 담당합니다. 해싱과 검증은 블로킹 스레드에서
//! 수행해 런타임 워커를 막지 않습니다.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use taskboard_core::{normalize_email, NewUser, PublicUser, TaskboardError, TaskboardResult};

use crate::auth::{dummy_hash, hash_password, verify_password, JwtConfig};
use crate::metrics;
use crate::repository::{Store, StoreError};

/// 가입 입력 (형식 검증 완료 상태).
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 로그인 성공 결과.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

/// 계정 서비스.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    jwt: JwtConfig,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtConfig) -> Self {
        Self { store, jwt }
    }

    /// 미가입 이메일 검증용 더미 해시를 미리 계산.
    ///
    /// 첫 로그인 실패 요청이 해시 생성 비용까지 부담하지 않도록 시작 시 호출합니다.
    pub async fn warm_up(&self) -> TaskboardResult<()> {
        tokio::task::spawn_blocking(dummy_hash)
            .await
            .map_err(|e| TaskboardError::Internal(format!("warm-up task failed: {}", e)))?
            .map(|_| ())
            .ok_or_else(|| TaskboardError::Internal("dummy hash unavailable".into()))
    }

    /// 새 계정 등록.
    ///
    /// 이메일은 정규화 후 저장합니다. 동시에 같은 이메일로 가입해도
    /// 저장소의 유일성 제약이 최종 판정하므로 한 건만 성공합니다.
    pub async fn register(&self, input: Registration) -> TaskboardResult<PublicUser> {
        let name = input.name.trim().to_string();
        let email = normalize_email(&input.email);
        if name.is_empty() {
            return Err(TaskboardError::validation("name", "must not be empty"));
        }

        // 해싱 전에 빠르게 걸러내기 (최종 판정은 insert)
        if self.store.find_user_by_email(&email).await?.is_some() {
            metrics::record_registration("duplicate");
            return Err(TaskboardError::Conflict("User already exists".into()));
        }

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| TaskboardError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| TaskboardError::Internal(e.to_string()))?;

        let user = match self
            .store
            .insert_user(NewUser {
                name,
                email,
                password_hash,
            })
            .await
        {
            Ok(user) => user,
            Err(StoreError::Duplicate(_)) => {
                metrics::record_registration("duplicate");
                return Err(TaskboardError::Conflict("User already exists".into()));
            }
            Err(e) => return Err(e.into()),
        };

        metrics::record_registration("created");
        info!(user_id = %user.id, "User registered");
        Ok(user.to_public())
    }

    /// 로그인 후 세션 토큰 발급.
    ///
    /// 미가입 이메일과 비밀번호 불일치는 같은 에러로 응답합니다.
    pub async fn login(&self, email: &str, password: &str) -> TaskboardResult<Session> {
        let email = normalize_email(email);
        let user = self.store.find_user_by_email(&email).await?;

        // 더미 해시 생성과 검증 모두 블로킹 스레드에서 수행
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || {
            match stored_hash.as_deref().or_else(|| dummy_hash()) {
                Some(hash) => verify_password(&password, hash).is_ok(),
                None => false,
            }
        })
        .await
        .map_err(|e| TaskboardError::Internal(format!("verify task failed: {}", e)))?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                metrics::record_login("invalid_credentials");
                warn!("Login failed: invalid credentials");
                return Err(TaskboardError::InvalidCredentials);
            }
        };

        let token = self
            .jwt
            .issue(&user)
            .map_err(|e| TaskboardError::Internal(e.to_string()))?;

        metrics::record_login("success");
        info!(user_id = %user.id, "User logged in");
        Ok(Session {
            token,
            user: user.to_public(),
        })
    }

    /// 계정과 소유한 모든 태스크를 원자적으로 삭제.
    ///
    /// 이미 삭제된 계정이면 `NotFound`. 저장소 실패 시 아무것도 지워지지 않습니다.
    pub async fn delete_account(&self, user_id: Uuid) -> TaskboardResult<()> {
        let deleted = self.store.delete_user_cascade(user_id).await?;
        if !deleted {
            return Err(TaskboardError::NotFound("User not found".into()));
        }

        metrics::record_account_deleted();
        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
