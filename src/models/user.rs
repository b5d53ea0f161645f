use crate::AuthError;
use crate::resolver::Record;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// ## 日本語
///
/// token の所有者のプロフィールです。構築後は不変です。
///
/// custom roles は順序を持たない集合として保持します。プロフィール API 自体はキャッシュ期間を
/// 返さないため、`cache_for` はフェッチャが与えます。
///
/// ## English
///
/// The profile of a token's owner. Immutable once constructed.
///
/// Custom roles are kept as an unordered set. The profile endpoint carries no cache
/// duration of its own, so `cache_for` is supplied by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    user: String,
    custom_roles: BTreeSet<String>,
    #[serde(skip)]
    cache_for: Duration,
}

impl User {
    pub fn new<I, S>(
        user: impl Into<String>,
        custom_roles: I,
        cache_for: Duration,
    ) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(AuthError::validation("user name cannot be empty"));
        }
        if cache_for.as_millis() == 0 {
            return Err(AuthError::validation("user cache duration must be positive"));
        }
        Ok(Self {
            user,
            custom_roles: custom_roles.into_iter().map(Into::into).collect(),
            cache_for,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn custom_roles(&self) -> &BTreeSet<String> {
        &self.custom_roles
    }

    /// ## 日本語
    ///
    /// 指定した custom role を持つかどうかを返します。
    ///
    /// ## English
    ///
    /// Returns whether the user has the given custom role.
    pub fn has_role(&self, role: &str) -> bool {
        self.custom_roles.contains(role)
    }
}

impl Record for User {
    const KIND: &'static str = "user";

    fn cache_for(&self) -> Duration {
        self.cache_for
    }
}
