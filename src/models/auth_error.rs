//! ## 日本語
//!
//! r-auth-client のエラー型です。
//!
//! ライブラリ全体で 1 つの小さなエラー型だけを使います。キャッシュ・リゾルバ・HTTP 層の
//! いずれも [`AuthError`] を返し、フェッチャ由来のエラーは変換せずにそのまま呼び出し元へ
//! 伝播します。メッセージに bearer token が含まれることはありません。
//!
//! ## English
//!
//! Error types for r-auth-client.
//!
//! The library keeps a single, small error type. The cache, the resolvers and the HTTP
//! layer all return [`AuthError`], and failures coming from a fetcher reach the caller
//! unchanged. No message ever contains the bearer token.

/// ## 日本語
///
/// r-auth-client が返すエラーの集合。
///
/// ## English
///
/// Errors returned by r-auth-client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// ## 日本語
    ///
    /// 呼び出し側の入力が不正（空の token など）。キャッシュやネットワークには到達しません。
    ///
    /// ## English
    ///
    /// Bad caller input, e.g. an empty token. Never reaches the cache or the network.
    #[error("{0}")]
    Validation(String),

    /// ## 日本語
    ///
    /// キャッシュ・クライアント構築時のパラメータが不正。
    ///
    /// ## English
    ///
    /// Bad cache or client construction parameters.
    #[error("{0}")]
    Configuration(String),

    /// ## 日本語
    ///
    /// 認証サービスが token を無効と判定した。
    ///
    /// ## English
    ///
    /// The auth service affirmatively rejected the token.
    #[error("{0}")]
    InvalidToken(String),

    /// ## 日本語
    ///
    /// 認証サービスがユーザー識別子を不正と判定した。
    ///
    /// ## English
    ///
    /// The auth service rejected the subject user identifier.
    #[error("{0}")]
    InvalidUser(String),

    /// ## 日本語
    ///
    /// 通信失敗、JSON 以外の応答、想定外のステータスや形式、サービス識別の不一致。
    ///
    /// ## English
    ///
    /// Transport failure, non-JSON body, unexpected status or body shape, or a service
    /// identity mismatch.
    #[error("{0}")]
    Service(String),
}

impl AuthError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    #[cfg(feature = "http")]
    pub(crate) fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }
}
