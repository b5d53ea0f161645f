/// ## 日本語
///
/// キャッシュ内の 1 件分。値と絶対的な有効期限（ミリ秒）を持ちます。
///
/// 有効期限は「挿入時刻 + エントリ固有の TTL」で、キャッシュ全体の定数ではありません。
///
/// ## English
///
/// One cached value plus its absolute expiration instant, in milliseconds.
///
/// The expiration is insertion time plus the entry's own TTL, not a cache-wide constant.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    value: V,
    expires_at_ms: u64,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(value: V, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    pub(crate) fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn expires_at_ms(&self) -> u64 {
        self.expires_at_ms
    }
}
