#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::empty_loop)]
#![deny(clippy::indexing_slicing)]
#![deny(unused)]
//! # r-auth-client
//!
//! A caching client for a remote bearer-token authentication service.
//!
//! Given an opaque token, the client resolves the token's metadata ([`Token`]: owner,
//! validity window, MFA status) and its owner's profile ([`User`]: custom roles). Every
//! lookup goes through a size-bounded LRU cache whose entries expire after the duration
//! each record carries, so repeated lookups do not hit the network.
//!
//! The library exposes these building blocks:
//! - [`TtlCache`]: generic LRU cache with a TTL per entry and an injectable [`Clock`].
//! - [`Resolver`]: validate, consult the cache, fetch on miss, cache, return.
//! - [`RecordFetcher`]: the seam to the remote service. [`AuthServiceClient`] implements it
//!   over HTTP (`http` feature).
//! - [`AuthClient`]: one token resolver plus one user resolver over a shared fetcher;
//!   [`BlockingAuthClient`] wraps it for synchronous callers (`blocking` feature).
//!
//! ## How resolution works
//!
//! 1. An empty or whitespace-only token fails with [`AuthError::Validation`].
//! 2. A live cache entry is returned immediately.
//! 3. On a miss the optional `on_cache_miss` callback runs, then the fetcher sends one
//!    request. Its errors reach the caller unchanged.
//! 4. The fetched record is cached for its own duration and returned.
//!
//! ## 日本語
//!
//! リモート認証サービス向けの、キャッシュ付きクライアントライブラリです。
//!
//! 不透明な token から、token のメタデータ（[`Token`]：所有者・有効期間・MFA 状態）と
//! 所有者のプロフィール（[`User`]：custom roles）を解決します。すべての参照は容量上限つきの
//! LRU キャッシュを経由し、各エントリはレコード自身が持つ期間で期限切れになります。
//!
//! ## 解決の流れ
//!
//! 1. token が空、または空白のみなら [`AuthError::Validation`]。
//! 2. 有効なキャッシュエントリがあれば即座に返す。
//! 3. ミスの場合は `on_cache_miss` を呼び、フェッチャが 1 回だけリクエストを送る。エラーはそのまま返す。
//! 4. 取得したレコードをその期間だけキャッシュして返す。

#[cfg(feature = "blocking")]
mod blocking;
mod cache;
mod client;
mod clock;
mod config;
mod models;
#[cfg(feature = "http")]
mod remote;
mod resolver;

#[cfg(feature = "blocking")]
pub use crate::blocking::BlockingAuthClient;
pub use crate::cache::{CacheStats, TtlCache};
pub use crate::client::AuthClient;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{ClientConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_USER_CACHE_FOR};
pub use crate::models::{AuthError, MfaStatus, Token, User};
#[cfg(feature = "http")]
pub use crate::remote::AuthServiceClient;
pub use crate::resolver::{OnCacheMiss, Record, RecordFetcher, Resolver, require_token};
