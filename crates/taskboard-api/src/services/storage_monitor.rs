//! 저장소 상태 주기 점검.
//!
//! 일정 주기로 저장소에 ping을 보내 `taskboard_storage_up` 게이지를 갱신합니다.
//! 상태가 바뀔 때만 로그를 남깁니다.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::metrics;
use crate::repository::Store;

/// 기본 점검 주기.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// 저장소 점검 서비스.
pub struct StorageMonitor {
    store: Arc<dyn Store>,
    interval: Duration,
}

impl StorageMonitor {
    pub fn new(store: Arc<dyn Store>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// 한 번 점검하고 게이지를 갱신합니다. 저장소가 응답하면 `true`.
    pub async fn check_once(&self) -> bool {
        let up = match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Storage ping failed");
                false
            }
        };
        metrics::record_storage_up(up);
        up
    }

    /// 메인 루프. `shutdown`이 취소되면 종료합니다.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut last = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let up = self.check_once().await;
                    if last != Some(up) {
                        if up {
                            tracing::info!(backend = %self.store.backend(), "Storage reachable");
                        } else {
                            tracing::warn!(backend = %self.store.backend(), "Storage unreachable");
                        }
                        last = Some(up);
                    }
                }

                _ = shutdown.cancelled() => {
                    tracing::info!("Storage monitor stopped");
                    break;
                }
            }
        }
    }
}

/// 백그라운드 점검 task 시작.
pub fn start_storage_monitor(
    store: Arc<dyn Store>,
    interval: Duration,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let monitor = StorageMonitor::new(store, interval);
    tokio::spawn(async move {
        monitor.run(shutdown).await;
    })
}
