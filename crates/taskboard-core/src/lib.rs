//! # Taskboard Core
//!
//! 태스크 보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 HTTP나 데이터베이스에 의존하지 않는 기본 타입을 제공합니다:
//! - 사용자 및 공개 프로필 타입
//! - 태스크, 우선순위, 부분 수정(patch) 타입
//! - 에러 분류 체계
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
