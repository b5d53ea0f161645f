//! ## 日本語
//!
//! token から各種レコードを解決するリゾルバです。
//!
//! 1. token が空、または空白のみなら [`AuthError::Validation`]（キャッシュにもネットワークにも触れない）
//! 2. キャッシュにあればそれを返す（コールバックもフェッチもしない）
//! 3. 無ければ `on_cache_miss` を呼んでからフェッチャで取得する（エラーはそのまま伝播）
//! 4. 成功したらレコード自身の `cache_for` を TTL としてキャッシュに入れて返す
//!
//! ## English
//!
//! Resolves records from bearer tokens.
//!
//! 1. An empty or whitespace-only token fails with [`AuthError::Validation`] before the
//!    cache or the network is touched
//! 2. A cache hit is returned as is, with no callback and no fetch
//! 3. On a miss, `on_cache_miss` runs first, then the fetcher; its errors pass through
//!    unchanged
//! 4. A fetched record is cached for its own `cache_for` and returned
//!
//! Two misses racing on the same key may both fetch; the last write wins.

use crate::AuthError;
use crate::cache::TtlCache;
use crate::clock::Clock;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A record the auth service resolves from a token.
pub trait Record: Send + Sync + 'static {
    /// Short name used in log events.
    const KIND: &'static str;

    /// How long this record may be cached.
    fn cache_for(&self) -> Duration;
}

/// ## 日本語
///
/// token を 1 回のリクエストでレコードに変換する能力です。ネットワーク I/O を行うのは
/// この実装だけです。
///
/// ## English
///
/// Turns a token into a record with exactly one request to the remote service. This is
/// the only place that performs network I/O.
#[async_trait]
pub trait RecordFetcher<R: Record>: Send + Sync {
    async fn fetch(&self, token: &str) -> Result<R, AuthError>;
}

#[async_trait]
impl<R: Record, F: RecordFetcher<R> + ?Sized> RecordFetcher<R> for Arc<F> {
    async fn fetch(&self, token: &str) -> Result<R, AuthError> {
        (**self).fetch(token).await
    }
}

/// Callback invoked right before a fetch caused by a cache miss.
pub type OnCacheMiss<'a> = Option<&'a (dyn Fn() + Send + Sync)>;

/// ## 日本語
///
/// token が空、または空白のみでないことを確認します。
///
/// ## English
///
/// Checks that a token is not empty or whitespace only.
pub fn require_token(token: &str) -> Result<(), AuthError> {
    if token.trim().is_empty() {
        return Err(AuthError::validation(
            "token is required and cannot be a whitespace only string",
        ));
    }
    Ok(())
}

/// ## 日本語
///
/// 1 種類のレコード用のリゾルバ。自分専用のキャッシュを持ちます。
///
/// ## English
///
/// Resolver for one record kind. Owns its own cache, so a token lookup and a user lookup
/// for the same bearer token hit or miss independently.
pub struct Resolver<R: Record, F> {
    cache: TtlCache<String, Arc<R>>,
    fetcher: F,
}

impl<R: Record, F: RecordFetcher<R>> Resolver<R, F> {
    pub fn new(fetcher: F, capacity: usize, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        Ok(Self {
            cache: TtlCache::new(capacity, clock)?,
            fetcher,
        })
    }

    /// ## 日本語
    ///
    /// token に対応するレコードを返します。キャッシュキーは trim 前の token そのものです。
    ///
    /// ## English
    ///
    /// Returns the record for `token`. The untrimmed token is the cache key; trimming is
    /// only used for the emptiness check.
    pub async fn resolve(
        &self,
        token: &str,
        on_cache_miss: OnCacheMiss<'_>,
    ) -> Result<Arc<R>, AuthError> {
        self.resolve_with_max_ttl(token, on_cache_miss, None).await
    }

    /// ## 日本語
    ///
    /// [`Resolver::resolve`] と同じですが、新しく取得したレコードのキャッシュ期間を
    /// `max_ttl` 以下に抑えます。既にキャッシュ済みのエントリには影響しません。
    ///
    /// ## English
    ///
    /// Same as [`Resolver::resolve`], but a freshly fetched record is cached for at most
    /// `max_ttl`. Entries already cached are left alone.
    pub async fn resolve_with_max_ttl(
        &self,
        token: &str,
        on_cache_miss: OnCacheMiss<'_>,
        max_ttl: Option<Duration>,
    ) -> Result<Arc<R>, AuthError> {
        require_token(token)?;

        if let Some(record) = self.cache.get(token) {
            debug!(kind = R::KIND, "cache hit");
            return Ok(record);
        }

        debug!(kind = R::KIND, "cache miss, fetching from auth service");
        if let Some(on_cache_miss) = on_cache_miss {
            on_cache_miss();
        }

        let record = Arc::new(self.fetcher.fetch(token).await?);
        let ttl = match max_ttl {
            Some(max_ttl) => record.cache_for().min(max_ttl),
            None => record.cache_for(),
        };
        self.cache.set(token.to_owned(), Arc::clone(&record), ttl)?;
        Ok(record)
    }

    pub fn cache(&self) -> &TtlCache<String, Arc<R>> {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
