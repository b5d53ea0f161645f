//! JSON shapes returned by the auth service's REST API.

use crate::AuthError;
use crate::models::{MfaStatus, Token, User};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Body of `GET api/V2/token`. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct TokenBody {
    id: Uuid,
    user: String,
    #[serde(default)]
    mfa: Option<String>,
    created: i64,
    expires: i64,
    cachefor: i64,
}

/// Body of `GET api/V2/me`. Only the username and custom roles are kept.
#[derive(Debug, Deserialize)]
struct MeBody {
    user: String,
    #[serde(default)]
    customroles: Vec<String>,
}

// 日本語: 形式不正はすべて ServiceError に寄せる（呼び出し側の入力の問題ではないため）。
// English: Any shape problem is the service's fault, so it becomes a ServiceError.
fn unexpected(kind: &str, err: impl std::fmt::Display) -> AuthError {
    AuthError::service(format!("Unexpected {kind} response from auth server: {err}"))
}

pub(crate) fn token_from_json(body: Value) -> Result<Token, AuthError> {
    let body: TokenBody = serde_json::from_value(body).map_err(|e| unexpected("token", e))?;
    let mfa = MfaStatus::from_wire(body.mfa.as_deref()).map_err(|e| unexpected("token", e))?;
    let cachefor = u64::try_from(body.cachefor)
        .map_err(|_| unexpected("token", format!("negative cachefor {}", body.cachefor)))?;
    Token::new(body.id, body.user, mfa, body.created, body.expires, cachefor)
        .map_err(|e| unexpected("token", e))
}

pub(crate) fn user_from_json(body: Value, cache_for: Duration) -> Result<User, AuthError> {
    let body: MeBody = serde_json::from_value(body).map_err(|e| unexpected("user", e))?;
    User::new(body.user, body.customroles, cache_for).map_err(|e| unexpected("user", e))
}
