//! ## 日本語
//!
//! キャッシュが使う時刻の供給元です。単位はミリ秒です。
//!
//! 既定は [`SystemClock`]（壁時計）。テストでは [`ManualClock`] や `Fn() -> u64` の
//! クロージャを差し込んで、期限切れを決定的に再現できます。
//!
//! ## English
//!
//! Time source for the cache, in milliseconds.
//!
//! The default is [`SystemClock`] (wall clock). Tests can inject a [`ManualClock`] or any
//! `Fn() -> u64` closure to drive expiration deterministically.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// ## 日本語
///
/// 現在時刻（ミリ秒）を返す時計。通常運用では単調非減少であることが期待されます。
///
/// ## English
///
/// Supplies "now" in milliseconds. Expected to be non-decreasing under normal operation.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now_ms(&self) -> u64 {
        self()
    }
}

/// Wall clock, Unix epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// ## 日本語
///
/// 手動で進める時計です。`Clone` は同じ時刻を共有するハンドルを増やします。
///
/// ## English
///
/// A clock that only moves when told to. `Clone` hands out another handle to the same
/// instant, so a test can keep one copy while the cache owns the other.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set_ms(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by_ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        let _ = self
            .now_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(by_ms))
            });
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
