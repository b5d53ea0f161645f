use crate::AuthError;
use crate::resolver::Record;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// ## 日本語
///
/// token の MFA 状態です。
///
/// ## English
///
/// The MFA status of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MfaStatus {
    /// The user used MFA when logging in.
    Used,
    /// The user chose not to use MFA when logging in.
    NotUsed,
    /// The identity provider does not report MFA, or MFA does not apply to this token type.
    Unknown,
}

impl MfaStatus {
    /// ## 日本語
    ///
    /// 認証サービスの文字列表現から MFA 状態を得ます（大文字小文字は区別しません）。
    ///
    /// 値が無い、または空文字列の場合は [`MfaStatus::Unknown`] になります。
    ///
    /// ## English
    ///
    /// Parses the auth service's string form, case-insensitively.
    ///
    /// A missing or empty value maps to [`MfaStatus::Unknown`].
    pub fn from_wire(value: Option<&str>) -> Result<Self, AuthError> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(Self::Unknown);
        };
        match value.to_ascii_lowercase().as_str() {
            "used" => Ok(Self::Used),
            "notused" => Ok(Self::NotUsed),
            "unknown" => Ok(Self::Unknown),
            other => Err(AuthError::validation(format!("Unknown MFA string: {other}"))),
        }
    }
}

impl fmt::Display for MfaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MfaStatus::Used => write!(f, "Used"),
            MfaStatus::NotUsed => write!(f, "NotUsed"),
            MfaStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// ## 日本語
///
/// 認証サービスから取得した token のメタデータです。構築後は不変です。
///
/// 時刻はすべて Unix epoch ミリ秒です。`cachefor` はこのレコード自体をキャッシュしてよい
/// 期間で、キャッシュ全体の設定とは独立しています。
///
/// ## English
///
/// Token metadata resolved from the auth service. Immutable once constructed.
///
/// All instants are Unix epoch milliseconds. `cachefor` is how long this particular
/// record may be cached, independent of any cache-wide policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    id: Uuid,
    user: String,
    mfa: MfaStatus,
    created: i64,
    expires: i64,
    cachefor: u64,
}

impl Token {
    /// ## 日本語
    ///
    /// 不変条件を検査して token レコードを作成します：
    /// - `user` は空白のみであってはならない
    /// - `expires > created`
    /// - `cachefor > 0`
    ///
    /// ## English
    ///
    /// Builds a token record, checking its invariants:
    /// - `user` is not blank
    /// - `expires > created`
    /// - `cachefor > 0`
    pub fn new(
        id: Uuid,
        user: impl Into<String>,
        mfa: MfaStatus,
        created: i64,
        expires: i64,
        cachefor: u64,
    ) -> Result<Self, AuthError> {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(AuthError::validation("token user cannot be empty"));
        }
        if expires <= created {
            return Err(AuthError::validation(format!(
                "token expiration {expires} must be after its creation {created}"
            )));
        }
        if cachefor == 0 {
            return Err(AuthError::validation("token cachefor must be positive"));
        }
        Ok(Self {
            id,
            user,
            mfa,
            created,
            expires,
            cachefor,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn mfa(&self) -> MfaStatus {
        self.mfa
    }

    /// Creation instant in epoch milliseconds.
    pub fn created(&self) -> i64 {
        self.created
    }

    /// Expiration instant in epoch milliseconds.
    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// How long this record may be cached, in milliseconds.
    pub fn cachefor(&self) -> u64 {
        self.cachefor
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.expires)
    }

    /// ## 日本語
    ///
    /// 指定時刻（epoch ミリ秒）の時点で token 自体が期限切れかどうかを返します。
    /// キャッシュの TTL とは関係ありません。
    ///
    /// ## English
    ///
    /// Whether the token itself has expired at `now_ms`. Unrelated to the cache TTL.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires <= now_ms
    }
}

impl Record for Token {
    const KIND: &'static str = "token";

    fn cache_for(&self) -> Duration {
        Duration::from_millis(self.cachefor)
    }
}
