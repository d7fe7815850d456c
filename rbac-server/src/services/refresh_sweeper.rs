//! 过期刷新令牌清理
//!
//! 由 `BackgroundTasks` 启动，按固定间隔删除已过期的 refresh_token 行。
//! 过期行本来就不会通过 `find_valid`，清理只是控制表大小。

use std::time::Duration;

use shared::util::now_millis;
use tokio_util::sync::CancellationToken;

use crate::db::repository::{RefreshTokenRepository, RepoResult};

/// Periodic purge of expired refresh tokens
pub struct RefreshTokenSweeper {
    store: RefreshTokenRepository,
    interval: Duration,
    shutdown: CancellationToken,
}

impl RefreshTokenSweeper {
    pub fn new(store: RefreshTokenRepository, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            store,
            interval,
            shutdown,
        }
    }

    /// One sweep at the current time
    pub async fn sweep_once(&self) -> RepoResult<u64> {
        let removed = self.store.sweep_expired(now_millis()).await?;
        if removed > 0 {
            tracing::info!(removed, "Expired refresh tokens purged");
        }
        Ok(removed)
    }

    /// 主循环：直到 shutdown 被触发
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Refresh token sweeper started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        tracing::error!("Refresh token sweep failed: {}", e);
                    }
                }
            }
        }

        tracing::info!("Refresh token sweeper stopped");
    }
}
