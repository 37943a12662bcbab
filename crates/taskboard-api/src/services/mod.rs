//! 비즈니스 로직 서비스.
//!
//! 라우트 핸들러는 요청 파싱과 응답 변환만 하고, 실제 규칙은
//! 여기의 서비스가 담당합니다.

pub mod account;
pub mod storage_monitor;
pub mod tasks;

pub use account::{AccountService, Registration, Session};
pub use storage_monitor::{start_storage_monitor, StorageMonitor, DEFAULT_CHECK_INTERVAL};
pub use tasks::TaskService;
