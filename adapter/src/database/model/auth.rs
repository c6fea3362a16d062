use crate::redis::model::{RedisKey, RedisValue};
use kernel::model::auth::{AccessToken, IdentityClaims};
use shared::error::AppError;

// 認証基盤で検証済みのトークンをキャッシュするキー
pub struct AuthorizationKey(String);

impl From<&AccessToken> for AuthorizationKey {
    fn from(token: &AccessToken) -> Self {
        Self(format!("auth:{}", token.0))
    }
}

impl RedisKey for AuthorizationKey {
    type Value = AuthorizedClaims;

    fn inner(&self) -> String {
        self.0.clone()
    }
}

pub struct AuthorizedClaims(pub IdentityClaims);

impl AuthorizedClaims {
    pub fn into_inner(self) -> IdentityClaims {
        self.0
    }
}

impl RedisValue for AuthorizedClaims {
    fn inner(&self) -> String {
        // IdentityClaims は文字列と ID のみなのでシリアライズは失敗しない
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl TryFrom<String> for AuthorizedClaims {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        serde_json::from_str(&s).map(Self).map_err(AppError::from)
    }
}
