use crate::AuthError;
use crate::config::ClientConfig;
use crate::models::{Token, User};
use crate::resolver::{OnCacheMiss, Record, RecordFetcher, Resolver};
use std::sync::Arc;

#[cfg(feature = "http")]
use crate::remote::AuthServiceClient;
#[cfg(feature = "http")]
use tracing::info;

/// ## 日本語
///
/// token 情報とユーザー情報をキャッシュ付きで解決するクライアントです。
///
/// 1 つのフェッチャを共有する 2 つのリゾルバ（token 用・ユーザー用）を持ちます。キャッシュは
/// 別々なので、同じ bearer token でも token の解決とユーザーの解決は独立してヒット／ミスします。
///
/// ## English
///
/// Client resolving token and user records through per-kind caches.
///
/// Holds two resolvers (token and user) over one shared fetcher. The caches are separate,
/// so for the same bearer token a token lookup and a user lookup hit or miss independently.
pub struct AuthClient<F> {
    tokens: Resolver<Token, Arc<F>>,
    users: Resolver<User, Arc<F>>,
    fetcher: Arc<F>,
}

impl<F> AuthClient<F>
where
    F: RecordFetcher<Token> + RecordFetcher<User>,
{
    /// ## 日本語
    ///
    /// 任意のフェッチャからクライアントを作成します。ハンドシェイクは行いません。
    ///
    /// ## English
    ///
    /// Builds the client over any fetcher. No handshake is performed.
    pub fn with_fetcher(fetcher: F, config: ClientConfig) -> Result<Self, AuthError> {
        config.validate()?;
        let fetcher = Arc::new(fetcher);
        Ok(Self {
            tokens: Resolver::new(
                Arc::clone(&fetcher),
                config.cache_capacity,
                Arc::clone(&config.clock),
            )?,
            users: Resolver::new(
                Arc::clone(&fetcher),
                config.cache_capacity,
                Arc::clone(&config.clock),
            )?,
            fetcher,
        })
    }

    /// ## 日本語
    ///
    /// token のメタデータを返します。結果はキャッシュされるため、呼び出し側での追加の
    /// キャッシュは通常不要です。`on_cache_miss` はキャッシュミスでフェッチする直前に呼ばれます。
    ///
    /// ## English
    ///
    /// Returns metadata for a token. Results are cached, so further caching by the caller
    /// is rarely useful. `on_cache_miss` runs right before a fetch caused by a miss.
    pub async fn get_token(
        &self,
        token: &str,
        on_cache_miss: OnCacheMiss<'_>,
    ) -> Result<Arc<Token>, AuthError> {
        self.tokens.resolve(token, on_cache_miss).await
    }

    /// ## 日本語
    ///
    /// token の所有者のプロフィール（custom roles を含む）を返します。
    ///
    /// token レコードがキャッシュ済みなら、プロフィールのキャッシュ期間はその `cachefor` を
    /// 超えません。
    ///
    /// ## English
    ///
    /// Returns the profile, including custom roles, of the token's owner.
    ///
    /// When the token's own record is cached, the profile is cached no longer than that
    /// record's `cachefor`.
    pub async fn get_user(
        &self,
        token: &str,
        on_cache_miss: OnCacheMiss<'_>,
    ) -> Result<Arc<User>, AuthError> {
        let max_ttl = self.tokens.cache().peek(token).map(|record| record.cache_for());
        self.users.resolve_with_max_ttl(token, on_cache_miss, max_ttl).await
    }

    pub fn token_cache(&self) -> &crate::cache::TtlCache<String, Arc<Token>> {
        self.tokens.cache()
    }

    pub fn user_cache(&self) -> &crate::cache::TtlCache<String, Arc<User>> {
        self.users.cache()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

#[cfg(feature = "http")]
impl AuthClient<AuthServiceClient> {
    /// ## 日本語
    ///
    /// 認証サービスに接続してクライアントを作成します。
    ///
    /// `base_url` は例えば `https://example.org/services/auth`。接続先が認証サービスでない場合は
    /// [`AuthError::Service`] を返します。
    ///
    /// ## English
    ///
    /// Connects to the auth service and builds the client.
    ///
    /// `base_url` is e.g. `https://example.org/services/auth`. Fails with
    /// [`AuthError::Service`] when the URL does not serve the auth service.
    pub async fn create(base_url: &str, config: ClientConfig) -> Result<Self, AuthError> {
        config.validate()?;
        let service = AuthServiceClient::create_with(base_url, config.user_cache_for).await?;
        let client = Self::with_fetcher(service, config)?;
        info!(
            capacity = client.token_cache().capacity(),
            "auth client ready"
        );
        Ok(client)
    }

    /// Returns the version of the auth service.
    pub async fn service_version(&self) -> Result<String, AuthError> {
        self.fetcher.service_version().await
    }
}
