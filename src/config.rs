use crate::AuthError;
use crate::clock::{Clock, SystemClock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default size bound for each of the token and user caches.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Default cache duration for user profiles, which carry none of their own.
///
/// A profile fetched while its token is cached is held no longer than that token's
/// `cachefor`.
pub const DEFAULT_USER_CACHE_FOR: Duration = Duration::from_secs(300);

/// ## 日本語
///
/// クライアント構築時に一度だけ与える設定です。
///
/// - `cache_capacity`：token キャッシュとユーザーキャッシュそれぞれの上限（既定 10000）
/// - `clock`：キャッシュの時計（既定は壁時計）
/// - `user_cache_for`：ユーザープロフィールをキャッシュする期間（既定 5 分）。token が
///   キャッシュ済みなら、その `cachefor` が上限になる
///
/// ## English
///
/// Settings supplied once, when the client is built.
///
/// - `cache_capacity`: bound for each of the token and user caches (default 10000)
/// - `clock`: time source for the caches (default: wall clock)
/// - `user_cache_for`: how long user profiles stay cached (default 5 minutes). The profile
///   endpoint returns no duration, so this is a fixed value; when the token's record is
///   cached, its `cachefor` caps it
#[derive(Clone)]
pub struct ClientConfig {
    pub cache_capacity: usize,
    pub clock: Arc<dyn Clock>,
    pub user_cache_for: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            clock: Arc::new(SystemClock),
            user_cache_for: DEFAULT_USER_CACHE_FOR,
        }
    }
}

impl ClientConfig {
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_user_cache_for(mut self, user_cache_for: Duration) -> Self {
        self.user_cache_for = user_cache_for;
        self
    }

    /// Rejects a zero capacity or a user cache duration under one millisecond.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.cache_capacity < 1 {
            return Err(AuthError::configuration("cache_capacity must be > 0"));
        }
        if self.user_cache_for.as_millis() == 0 {
            return Err(AuthError::configuration(
                "user_cache_for must be at least 1ms",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("cache_capacity", &self.cache_capacity)
            .field("user_cache_for", &self.user_cache_for)
            .finish_non_exhaustive()
    }
}
