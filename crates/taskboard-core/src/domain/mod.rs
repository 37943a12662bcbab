//! 태스크 관리를 위한 도메인 모델.

mod task;
mod user;

pub mod serde_helpers;

pub use task::*;
pub use user::*;
