//! ## 日本語
//!
//! 容量上限つき・エントリごとの TTL つき LRU キャッシュです。
//!
//! - 容量を超えると、まず期限切れのエントリを捨て、それでも満杯なら最も長く参照されていない
//!   （get/set の両方を参照とみなす）エントリを追い出します
//! - 期限切れは読み取り時に遅延判定し、ミスとして扱ってその場で削除します
//! - 時刻は差し込み可能な [`Clock`] から取得します
//!
//! 内部状態は 1 つの `Mutex` で守られ、ロック中に `.await` することはありません。
//!
//! ## English
//!
//! A size-bounded LRU cache with a TTL per entry.
//!
//! - Over capacity, expired entries go first, then the least recently used live one; both
//!   reads and writes count as use
//! - Expiration is checked lazily on read; an expired entry is a miss and is removed then
//! - Time comes from an injectable [`Clock`]
//!
//! All state sits behind one `Mutex` that is never held across an `.await`.

mod entry;
mod stats;

pub use stats::CacheStats;

use crate::AuthError;
use crate::clock::{Clock, SystemClock};
use entry::CacheEntry;
use lru::LruCache;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct CacheState<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    stats: CacheStats,
    // Lower bound on the earliest expiration among stored entries.
    next_expiry_ms: u64,
}

/// ## 日本語
///
/// 汎用の TTL + LRU キャッシュ。token 用とユーザー用で同じ型を 2 回インスタンス化します。
///
/// ## English
///
/// Generic TTL + LRU cache. The token and user resolvers each own one instance of this
/// same type.
pub struct TtlCache<K: Hash + Eq, V> {
    state: Mutex<CacheState<K, V>>,
    clock: Arc<dyn Clock>,
}

impl<K: Hash + Eq, V> TtlCache<K, V> {
    /// ## 日本語
    ///
    /// 容量と時計を指定してキャッシュを作成します。容量が 0 の場合は
    /// [`AuthError::Configuration`] を返します。
    ///
    /// ## English
    ///
    /// Creates a cache holding at most `capacity` entries and reading time from `clock`.
    ///
    /// Returns [`AuthError::Configuration`] when `capacity` is zero.
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| AuthError::configuration("cache capacity must be > 0"))?;
        Ok(Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
                next_expiry_ms: u64::MAX,
            }),
            clock,
        })
    }

    /// Same as [`TtlCache::new`] with the wall clock.
    pub fn with_system_clock(capacity: usize) -> Result<Self, AuthError> {
        Self::new(capacity, Arc::new(SystemClock))
    }

    /// ## 日本語
    ///
    /// 値を返し、エントリを最新参照にします。
    ///
    /// 存在しない、または `now >= 有効期限` の場合は `None` を返します。期限切れエントリは
    /// このときに削除されます。
    ///
    /// ## English
    ///
    /// Returns the value and marks the entry most recently used.
    ///
    /// Returns `None` when the key is unknown or `now >= expiration`; an expired entry is
    /// removed on the spot.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let now = self.clock.now_ms();
        let mut state = self.state.lock();

        let expired = match state.entries.peek(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                state.stats.misses += 1;
                return None;
            }
        };

        if expired {
            state.entries.pop(key);
            state.stats.misses += 1;
            state.stats.expirations += 1;
            debug!(size = state.entries.len(), "cache entry expired on read");
            return None;
        }

        let value = state.entries.get(key).map(|entry| entry.value().clone());
        state.stats.hits += 1;
        value
    }

    /// ## 日本語
    ///
    /// エントリを挿入または上書きし、有効期限を `now + ttl` に設定して最新参照にします。
    ///
    /// 容量を超える場合は、まず期限切れのエントリを削除し、それでも足りなければ最も古い参照の
    /// エントリを同じロック内で追い出します。戻った時点で容量の不変条件は常に成立しています。`ttl` が 1 ミリ秒未満の場合は
    /// [`AuthError::Configuration`] を返します。
    ///
    /// ## English
    ///
    /// Inserts or overwrites an entry expiring at `now + ttl` and marks it most recently
    /// used.
    ///
    /// If the insert would exceed capacity, expired entries are dropped first; only when none
    /// are expired is the least recently used entry evicted. Both happen under the same lock,
    /// so the capacity bound holds as soon as this returns. A `ttl` below one
    /// millisecond is rejected with [`AuthError::Configuration`].
    pub fn set(&self, key: K, value: V, ttl: Duration) -> Result<(), AuthError> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        if ttl_ms == 0 {
            return Err(AuthError::configuration("cache ttl must be at least 1ms"));
        }

        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        let replacing = state.entries.contains(&key);

        // 日本語: 満杯なら、生きているエントリを追い出す前に期限切れのエントリで枠を空ける。
        // English: when full, expired entries give up their slots before a live one is evicted.
        if !replacing && state.entries.len() >= state.entries.cap().get() {
            let reclaimed = Self::remove_expired(&mut state, now);
            if reclaimed > 0 {
                debug!(reclaimed, "reclaimed expired cache entries before insert");
            }
        }

        let entry = CacheEntry::new(value, now, ttl_ms);
        state.next_expiry_ms = state.next_expiry_ms.min(entry.expires_at_ms());
        let displaced = state.entries.push(key, entry);

        if displaced.is_some() && !replacing {
            state.stats.evictions += 1;
            debug!(size = state.entries.len(), "evicted least recently used cache entry");
        }
        Ok(())
    }

    /// Drops an entry. Returns whether one was present, expired or not.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().entries.pop(key).is_some()
    }

    /// Whether a live entry exists. Does not touch recency or the counters.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();
        self.state
            .lock()
            .entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Returns a live value without touching recency or the counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let now = self.clock.now_ms();
        self.state
            .lock()
            .entries
            .peek(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value().clone())
    }

    /// ## 日本語
    ///
    /// エントリの有効期限（ミリ秒）を返します。存在しない場合は `None`。
    ///
    /// 本メソッドは期限切れ判定も参照順の更新も行いません。
    ///
    /// ## English
    ///
    /// Returns the stored expiration instant (milliseconds) of an entry, or `None` if the
    /// key is unknown.
    ///
    /// Neither checks expiration nor touches recency.
    pub fn expires_at_ms<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state
            .lock()
            .entries
            .peek(key)
            .map(|entry| entry.expires_at_ms())
    }

    /// ## 日本語
    ///
    /// 期限切れのエントリをまとめて削除し、削除した件数を返します。
    ///
    /// ## English
    ///
    /// Removes every expired entry and returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        Self::remove_expired(&mut state, now)
    }

    // Walks from the least recently used end; counts removals as expirations.
    fn remove_expired(state: &mut CacheState<K, V>, now: u64) -> usize {
        if now < state.next_expiry_ms {
            return 0;
        }

        let mut kept = Vec::with_capacity(state.entries.len());
        let mut removed = 0usize;
        let mut next_expiry_ms = u64::MAX;
        while let Some((key, entry)) = state.entries.pop_lru() {
            if entry.is_expired_at(now) {
                removed += 1;
            } else {
                next_expiry_ms = next_expiry_ms.min(entry.expires_at_ms());
                kept.push((key, entry));
            }
        }
        state.next_expiry_ms = next_expiry_ms;
        // 日本語: 古い順に積み直すので参照順は変わらない。
        // English: re-pushed oldest first, so recency order is unchanged.
        for (key, entry) in kept {
            state.entries.push(key, entry);
        }
        state.stats.expirations += removed as u64;
        removed
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.next_expiry_ms = u64::MAX;
    }

    /// Number of stored entries, including expired ones not yet read or pruned.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }
}
