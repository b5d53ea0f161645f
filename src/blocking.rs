//! ## 日本語
//!
//! 同期 API です。非同期クライアントを専用の current-thread ランタイムで駆動するだけの
//! 薄いラッパーで、キャッシュとリゾルバのロジックは共有しています。
//!
//! 非同期ランタイムの内部（`#[tokio::main]` の中など）から呼ぶとパニックします。
//!
//! ## English
//!
//! Blocking API. A thin wrapper that drives the async client on a private current-thread
//! runtime; the cache and resolver logic is shared.
//!
//! Calling it from inside an async runtime (e.g. within `#[tokio::main]`) panics.

use crate::AuthError;
use crate::client::AuthClient;
use crate::config::ClientConfig;
use crate::models::{Token, User};
use crate::remote::AuthServiceClient;
use crate::resolver::OnCacheMiss;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Blocking counterpart of [`AuthClient`].
pub struct BlockingAuthClient {
    inner: AuthClient<AuthServiceClient>,
    runtime: Runtime,
}

impl BlockingAuthClient {
    pub fn create(base_url: &str, config: ClientConfig) -> Result<Self, AuthError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AuthError::configuration(format!("failed to start runtime: {e}")))?;
        let inner = runtime.block_on(AuthClient::create(base_url, config))?;
        Ok(Self { inner, runtime })
    }

    pub fn get_token(
        &self,
        token: &str,
        on_cache_miss: OnCacheMiss<'_>,
    ) -> Result<Arc<Token>, AuthError> {
        self.runtime.block_on(self.inner.get_token(token, on_cache_miss))
    }

    pub fn get_user(
        &self,
        token: &str,
        on_cache_miss: OnCacheMiss<'_>,
    ) -> Result<Arc<User>, AuthError> {
        self.runtime.block_on(self.inner.get_user(token, on_cache_miss))
    }

    pub fn service_version(&self) -> Result<String, AuthError> {
        self.runtime.block_on(self.inner.service_version())
    }

    /// The async client this wrapper drives.
    pub fn inner(&self) -> &AuthClient<AuthServiceClient> {
        &self.inner
    }
}
