//! ## 日本語
//!
//! 認証サービスの REST API を叩く HTTP クライアントです。
//!
//! token レコードとユーザーレコードの [`RecordFetcher`] 実装を提供します。1 回のフェッチで
//! 送るリクエストは常に 1 本で、再試行はしません。構築時にはサービスの識別確認（ハンドシェイク）を
//! 行います。
//!
//! ## English
//!
//! HTTP client for the auth service's REST API.
//!
//! Implements [`RecordFetcher`] for token and user records. Each fetch sends exactly one
//! request and never retries. Construction performs a handshake that checks the service
//! identity.

use crate::AuthError;
use crate::config::DEFAULT_USER_CACHE_FOR;
use crate::models::{Token, User};
use crate::remote::wire;
use crate::resolver::RecordFetcher;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// `servicename` reported by the root endpoint of the auth service.
const SERVICE_NAME: &str = "Authentication Service";

/// Application code for a token that does not belong to a live session.
const APPCODE_INVALID_TOKEN: i64 = 10020;

/// Application code for an illegal user name.
const APPCODE_ILLEGAL_USER: i64 = 30010;

/// ## 日本語
///
/// 認証サービス用の HTTP クライアント。`Clone` は内部の接続プールを共有します。
///
/// ## English
///
/// HTTP client for the auth service. `Clone` shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AuthServiceClient {
    // 日本語: 末尾が必ず '/' になるよう正規化したベース URL。
    // English: Base URL, normalized to always end with '/'.
    base_url: String,
    token_url: String,
    me_url: String,
    user_cache_for: Duration,
    http: reqwest::Client,
}

impl AuthServiceClient {
    /// ## 日本語
    ///
    /// クライアントを作成し、`base_url` が認証サービスであることを確認します。
    ///
    /// ## English
    ///
    /// Creates the client and checks that `base_url` points at the auth service.
    pub async fn create(base_url: &str) -> Result<Self, AuthError> {
        Self::create_with(base_url, DEFAULT_USER_CACHE_FOR).await
    }

    /// Same as [`AuthServiceClient::create`], with the cache duration given to user
    /// records.
    pub async fn create_with(base_url: &str, user_cache_for: Duration) -> Result<Self, AuthError> {
        let client = Self::new(base_url, user_cache_for)?;
        let root = client.get_json(&client.base_url, None).await?;
        if root.get("servicename").and_then(Value::as_str) != Some(SERVICE_NAME) {
            return Err(AuthError::service(format!(
                "The service at url {base_url} is not the auth service"
            )));
        }
        info!(url = %client.base_url, "connected to auth service");
        Ok(client)
    }

    fn new(base_url: &str, user_cache_for: Duration) -> Result<Self, AuthError> {
        if base_url.trim().is_empty() {
            return Err(AuthError::validation(
                "base_url is required and cannot be a whitespace only string",
            ));
        }
        if user_cache_for.as_millis() == 0 {
            return Err(AuthError::configuration("user_cache_for must be at least 1ms"));
        }

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AuthError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            token_url: format!("{base_url}api/V2/token"),
            me_url: format!("{base_url}api/V2/me"),
            base_url,
            user_cache_for,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the version reported by the auth service.
    pub async fn service_version(&self) -> Result<String, AuthError> {
        let root = self.get_json(&self.base_url, None).await?;
        root.get("version")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AuthError::service("Auth server response is missing a version"))
    }

    async fn get_json(&self, url: &str, token: Option<&str>) -> Result<Value, AuthError> {
        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }

        // 日本語: reqwest のエラー文字列には URL が入るが、token はヘッダにあるので漏れない。
        // English: reqwest errors mention the URL; the token lives in a header, so it stays out.
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::service(format!("Failed to reach auth server: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::service(format!("Failed to read auth server response: {e}")))?;
        check_response(status, &body)
    }
}

/// ## 日本語
///
/// 応答を検査して JSON を返します。
///
/// - JSON でない：ステータスコード付きの ServiceError
/// - 200 以外：appcode 10020 は InvalidToken、30010 は InvalidUser、それ以外は ServiceError
///
/// ## English
///
/// Checks a response and returns its JSON body.
///
/// - Not JSON: ServiceError naming the status code
/// - Not 200: appcode 10020 is InvalidToken, 30010 is InvalidUser, anything else is a
///   ServiceError carrying the server's message
pub(crate) fn check_response(status: u16, body: &str) -> Result<Value, AuthError> {
    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => {
            let err = format!("Non-JSON response from auth server, status code: {status}");
            warn!(status, response = body, "non-JSON response from auth server");
            return Err(AuthError::service(err));
        }
    };
    if status == 200 {
        return Ok(json);
    }

    // 日本語: JSON が返ってきた時点で認証サービスだとみなし、そのエラー構造に依存する。
    // English: A JSON error body is assumed to come from the auth service and follow its shape.
    let error = json.get("error");
    let appcode = error.and_then(|e| e.get("appcode")).and_then(Value::as_i64);
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error");

    Err(match appcode {
        Some(APPCODE_INVALID_TOKEN) => {
            AuthError::InvalidToken("Auth server reported token is invalid.".to_string())
        }
        Some(APPCODE_ILLEGAL_USER) => AuthError::InvalidUser(illegal_user_message(message)),
        _ => AuthError::service(format!("Error from auth server: {message}")),
    })
}

// 日本語: サーバは "30010 Illegal user name: ..." の前にプレフィックスを重ねてくるので、
//        最大 3 回 ':' で分割した最後の要素だけを使う。
// English: The server stacks prefixes in front of the detail; keep the last piece after
//          splitting on ':' at most three times.
fn illegal_user_message(message: &str) -> String {
    message
        .splitn(4, ':')
        .last()
        .unwrap_or(message)
        .to_string()
}

#[async_trait]
impl RecordFetcher<Token> for AuthServiceClient {
    async fn fetch(&self, token: &str) -> Result<Token, AuthError> {
        let body = self.get_json(&self.token_url, Some(token)).await?;
        wire::token_from_json(body)
    }
}

#[async_trait]
impl RecordFetcher<User> for AuthServiceClient {
    async fn fetch(&self, token: &str) -> Result<User, AuthError> {
        let body = self.get_json(&self.me_url, Some(token)).await?;
        wire::user_from_json(body, self.user_cache_for)
    }
}
